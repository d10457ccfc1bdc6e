//! The type-name slot kind: angle brackets, dotted names, and the
//! aggressive character filter.

#[cfg(test)]
mod tests {
    use crate::harness::*;

    #[test]
    fn test_plain_and_dotted_names() {
        check_type_insert("String", "{String$}");
        check_type_insert("java.util.List", "{java}.{util}.{List$}");
    }

    #[test]
    fn test_generics_use_angle_brackets() {
        check_type_insert("List<String>", "{List}_<{String}>_{$}");
        check_type_insert("Map<K,V>", "{Map}_<{K},{V}>_{$}");
        check_type_insert("Map<K,List<V>>", "{Map}_<{K},{List}_<{V}>_{}>_{$}");
    }

    #[test]
    fn test_array_brackets() {
        check_type_insert("int[]", "{int}_[{}]_{$}");
    }

    #[test]
    fn test_foreign_characters_are_dropped() {
        check_type_insert("a+(b-c)", "{abc$}");
        check_type_insert("my type", "{mytype$}");
        check_type_insert("\"x\"", "{x$}");
    }

    #[test]
    fn test_double_dot_is_not_a_type_operator() {
        check_type_insert("a..b", "{a}.{}.{b$}");
    }

    #[test]
    fn test_unmatched_angle_closer_is_dropped() {
        check_type_insert("List>", "{List$}");
    }
}
