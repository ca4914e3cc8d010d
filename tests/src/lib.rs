//! Test-only package; see the `flows/` integration tests.
