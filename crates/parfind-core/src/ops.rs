//! Operation records consumed by the batch executor and the workload loaders.

/// The three operations every engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Merge the sets containing the two operands.
    Union,
    /// Resolve the representative of the first operand; the second is ignored.
    Find,
    /// Ask whether the two operands currently share a representative.
    SameSet,
}

impl OpKind {
    /// The wire encoding used by the numeric workload format.
    pub fn code(self) -> u8 {
        match self {
            OpKind::Union => 0,
            OpKind::Find => 1,
            OpKind::SameSet => 2,
        }
    }

    /// Decodes a numeric wire code (`0` = UNION, `1` = FIND, `2` = SAME_SET).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(OpKind::Union),
            1 => Some(OpKind::Find),
            2 => Some(OpKind::SameSet),
            _ => None,
        }
    }
}

/// One operation against an engine.
///
/// `b` is carried for every kind to match the wire format; FIND ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// What to do.
    pub kind: OpKind,
    /// First operand.
    pub a: usize,
    /// Second operand (ignored for [`OpKind::Find`]).
    pub b: usize,
}

impl Operation {
    /// A UNION of `a` and `b`.
    pub fn union(a: usize, b: usize) -> Self {
        Self {
            kind: OpKind::Union,
            a,
            b,
        }
    }

    /// A FIND of `a`.
    pub fn find(a: usize) -> Self {
        Self {
            kind: OpKind::Find,
            a,
            b: 0,
        }
    }

    /// A SAME_SET query of `a` and `b`.
    pub fn same_set(a: usize, b: usize) -> Self {
        Self {
            kind: OpKind::SameSet,
            a,
            b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_round_trip() {
        for kind in [OpKind::Union, OpKind::Find, OpKind::SameSet] {
            assert_eq!(OpKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(OpKind::from_code(3), None);
        assert_eq!(OpKind::from_code(255), None);
    }

    #[test]
    fn find_constructor_zeroes_b() {
        let op = Operation::find(7);
        assert_eq!(op.kind, OpKind::Find);
        assert_eq!(op.a, 7);
        assert_eq!(op.b, 0);
    }
}
