//! JSON shapes of the shared value types. These are persisted and
//! exchanged by embedders, so the encoding is part of the contract.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use slot_types::{CaretPos, Precedence, SpanMapping, TextRange, TextSpace};

    #[test]
    fn test_caret_pos_shape() {
        let p = CaretPos::path(&[1, 0], 2);
        let v = json!({"Field": [1, {"Field": [0, {"Leaf": 2}]}]});
        assert_eq!(serde_json::to_value(&p).unwrap(), v);
        let back: CaretPos = serde_json::from_value(v).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_up_variant_shape() {
        let p = CaretPos::up(CaretPos::leaf(0));
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({"Up": {"Leaf": 0}})
        );
    }

    #[test]
    fn test_precedence_and_space_are_strings() {
        assert_eq!(
            serde_json::to_value(Precedence::High).unwrap(),
            json!("High")
        );
        assert_eq!(serde_json::to_value(Precedence::Dot).unwrap(), json!("Dot"));
        assert_eq!(
            serde_json::to_value(TextSpace::Surface).unwrap(),
            json!("Surface")
        );
        assert_eq!(
            serde_json::to_value(TextSpace::Target).unwrap(),
            json!("Target")
        );
    }

    #[test]
    fn test_span_mapping_shape() {
        let m = SpanMapping {
            source: TextRange::new(0, 1),
            target: TextRange::new(22, 23),
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({"source": {"start": 0, "end": 1}, "target": {"start": 22, "end": 23}})
        );
    }
}
