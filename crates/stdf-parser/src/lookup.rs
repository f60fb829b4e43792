//! Code tables combining discrete keys with inclusive key ranges.

/// A lookup table of exact entries plus inclusive `(start, end, value)` ranges.
///
/// Exact entries are tried first; ranges are then scanned in order and the
/// first one containing the key wins.
#[derive(Debug)]
pub struct CodeTable<K: 'static, V: 'static> {
    pub exact: &'static [(K, V)],
    pub ranges: &'static [(K, K, V)],
}

impl<K: PartialOrd + Copy + 'static, V: 'static> CodeTable<K, V> {
    pub fn get(&self, key: K) -> Option<&V> {
        if let Some((_, v)) = self.exact.iter().find(|(k, _)| *k == key) {
            return Some(v);
        }
        self.ranges
            .iter()
            .find(|(start, end, _)| *start <= key && key <= *end)
            .map(|(_, _, v)| v)
    }

    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }
}

/// FAR CPU_TYPE classification.
pub const CPU_TYPES: CodeTable<u8, &str> = CodeTable {
    exact: &[
        (0, "DEC PDP-11 and VAX processors. F and D floating point..."),
        (1, "Sun 1, 2, 3, and 4 computers."),
        (2, "Sun 386i computers, and IBM PC"),
    ],
    ranges: &[
        (3, 127, "Reserved by Teradyne"),
        (128, 255, "Reserved by Customer"),
    ],
};

/// MIR MODE_COD descriptions.
pub const MODE_CODES: CodeTable<char, &str> = CodeTable {
    exact: &[
        ('A', "AEL mode"),
        ('C', "Checker mode"),
        ('D', "D"),
        ('E', "E"),
        ('M', "M"),
        ('P', "P"),
        ('Q', "Q"),
    ],
    ranges: &[],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_type_exact() {
        assert_eq!(CPU_TYPES.get(1), Some(&"Sun 1, 2, 3, and 4 computers."));
    }

    #[test]
    fn test_cpu_type_ranges_inclusive() {
        assert_eq!(CPU_TYPES.get(3), Some(&"Reserved by Teradyne"));
        assert_eq!(CPU_TYPES.get(127), Some(&"Reserved by Teradyne"));
        assert_eq!(CPU_TYPES.get(128), Some(&"Reserved by Customer"));
        assert_eq!(CPU_TYPES.get(255), Some(&"Reserved by Customer"));
    }

    #[test]
    fn test_exact_wins_over_range() {
        const T: CodeTable<u8, &str> = CodeTable {
            exact: &[(5, "five")],
            ranges: &[(0, 10, "low"), (5, 6, "never")],
        };
        assert_eq!(T.get(5), Some(&"five"));
        assert_eq!(T.get(6), Some(&"low"));
        assert!(!T.contains(11));
    }

    #[test]
    fn test_mode_codes() {
        assert_eq!(MODE_CODES.get('C'), Some(&"Checker mode"));
        assert_eq!(MODE_CODES.get('Z'), None);
    }
}
