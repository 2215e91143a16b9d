//! Tests for the identity context.
