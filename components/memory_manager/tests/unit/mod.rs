//! Unit tests for memory_manager driven through the public API
