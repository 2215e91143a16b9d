//! Tests for the review context.

mod service_tests;
