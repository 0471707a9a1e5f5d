//! End-to-end parse behavior tests
