//! Cross-cutting lifecycle scenario tests.
