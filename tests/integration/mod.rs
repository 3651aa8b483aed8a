//! Integration tests for the pin-mirror binary
//!
//! Each test builds a throwaway mirror repository with a bare remote and
//! serves the release index from a local HTTP listener.


mod test_failures;
mod test_mirror;
mod test_plan;
