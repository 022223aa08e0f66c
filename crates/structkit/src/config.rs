// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-level configuration for declared struct types.
//!
//! All defaults live here; builders and schemas read them from this module
//! rather than repeating literals.

/// Instances reject field writes once construction completes.
pub const DEFAULT_IMMUTABLE: bool = true;

/// Base type fields are not merged unless a type opts in.
pub const DEFAULT_INHERIT_FIELDS: bool = false;

/// Flags resolved once per struct type at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructOptions {
    /// Reject writes after construction (and allow hashing).
    pub immutable: bool,
    /// Prepend each base type's fields, left to right.
    pub inherit_fields: bool,
}

impl StructOptions {
    /// Options for a mutable type with no field inheritance.
    pub const fn mutable() -> Self {
        Self {
            immutable: false,
            inherit_fields: DEFAULT_INHERIT_FIELDS,
        }
    }

    /// Set the immutability flag.
    pub const fn with_immutable(mut self, immutable: bool) -> Self {
        self.immutable = immutable;
        self
    }

    /// Set the field inheritance flag.
    pub const fn with_inherit_fields(mut self, inherit_fields: bool) -> Self {
        self.inherit_fields = inherit_fields;
        self
    }
}

impl Default for StructOptions {
    fn default() -> Self {
        Self {
            immutable: DEFAULT_IMMUTABLE,
            inherit_fields: DEFAULT_INHERIT_FIELDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = StructOptions::default();
        assert!(opts.immutable);
        assert!(!opts.inherit_fields);
    }

    #[test]
    fn test_chained_setters() {
        let opts = StructOptions::mutable().with_inherit_fields(true);
        assert!(!opts.immutable);
        assert!(opts.inherit_fields);
        assert!(opts.with_immutable(true).immutable);
    }
}
