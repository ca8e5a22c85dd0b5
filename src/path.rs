use serde_json::Value;

/// The result of following a dotted path through a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// Some segment of the path does not exist.
    Missing,
    /// A value borrowed straight out of the record.
    Found(&'a Value),
    /// A value that is not stored in the record but derived from it while
    /// projecting: a character of a string, or a length.
    Computed(Value),
    /// The path crossed an array: one resolution per element, in order.
    Projection(Vec<Resolved<'a>>),
}

impl<'a> Resolved<'a> {
    /// Loosely absent: missing, or present but `null`.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Resolved::Missing | Resolved::Found(Value::Null) | Resolved::Computed(Value::Null)
        )
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Resolved::Found(Value::Array(_)) | Resolved::Projection(_))
    }

    /// Elements of a sequence; empty for anything else.
    pub fn elements(&self) -> Vec<Resolved<'a>> {
        match self {
            Resolved::Found(value) => match *value {
                Value::Array(items) => items.iter().map(Resolved::Found).collect(),
                _ => Vec::new(),
            },
            Resolved::Projection(items) => items.clone(),
            Resolved::Computed(_) | Resolved::Missing => Vec::new(),
        }
    }
}

/// Resolve `path` (segments separated by `.`) against `record`.
///
/// Mappings are descended into. Arrays project the segment across every
/// element, keeping order and length. Hitting a scalar, `null` or a missing
/// value before the path is exhausted yields [`Resolved::Missing`].
pub fn resolve<'a>(path: &str, record: &'a Value) -> Resolved<'a> {
    let mut current = Resolved::Found(record);
    for segment in path.split('.') {
        current = match current {
            Resolved::Found(Value::Object(map)) => {
                map.get(segment).map_or(Resolved::Missing, Resolved::Found)
            }
            Resolved::Found(Value::Array(items)) => Resolved::Projection(
                items
                    .iter()
                    .map(|item| member(&Resolved::Found(item), segment))
                    .collect(),
            ),
            Resolved::Projection(items) => {
                Resolved::Projection(items.iter().map(|item| member(item, segment)).collect())
            }
            _ => return Resolved::Missing,
        };
    }
    current
}

/// Property access on a single projected element.
///
/// Mappings answer their keys. Arrays and strings answer numeric segments
/// and `length`; strings are indexed by `char`. Nothing else has members.
fn member<'a>(element: &Resolved<'a>, segment: &str) -> Resolved<'a> {
    match element {
        Resolved::Found(value) => match *value {
            Value::Object(map) => map.get(segment).map_or(Resolved::Missing, Resolved::Found),
            Value::Array(items) if segment == "length" => Resolved::Computed(Value::from(items.len())),
            Value::Array(items) => index(segment)
                .and_then(|idx| items.get(idx))
                .map_or(Resolved::Missing, Resolved::Found),
            Value::String(s) => string_member(s, segment),
            _ => Resolved::Missing,
        },
        Resolved::Projection(items) if segment == "length" => {
            Resolved::Computed(Value::from(items.len()))
        }
        Resolved::Projection(items) => index(segment)
            .and_then(|idx| items.get(idx))
            .cloned()
            .unwrap_or(Resolved::Missing),
        Resolved::Computed(Value::String(s)) => string_member(s, segment),
        Resolved::Computed(_) | Resolved::Missing => Resolved::Missing,
    }
}

fn index(segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok()
}

fn string_member<'a>(s: &str, segment: &str) -> Resolved<'a> {
    if segment == "length" {
        return Resolved::Computed(Value::from(s.chars().count()));
    }
    index(segment)
        .and_then(|idx| s.chars().nth(idx))
        .map_or(Resolved::Missing, |c| Resolved::Computed(Value::String(c.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn descends_into_nested_mappings() {
        let record = json!({"customer": {"address": {"country": "FR"}}});
        assert_eq!(
            resolve("customer.address.country", &record),
            Resolved::Found(&json!("FR"))
        );
    }

    #[test]
    fn missing_key_is_missing() {
        let record = json!({"customer": {}});
        assert_eq!(resolve("customer.name", &record), Resolved::Missing);
        assert_eq!(resolve("nope", &record), Resolved::Missing);
    }

    #[test]
    fn scalar_in_the_middle_short_circuits() {
        let record = json!({"total": 120, "note": null});
        assert_eq!(resolve("total.amount", &record), Resolved::Missing);
        assert_eq!(resolve("note.text", &record), Resolved::Missing);
        assert_eq!(resolve("a", &json!(42)), Resolved::Missing);
    }

    #[test]
    fn projects_across_arrays_preserving_gaps() {
        let record = json!({"items": [{"sku": "A"}, {"qty": 2}, {"sku": "C"}]});
        let a = json!("A");
        let c = json!("C");
        assert_eq!(
            resolve("items.sku", &record),
            Resolved::Projection(vec![
                Resolved::Found(&a),
                Resolved::Missing,
                Resolved::Found(&c),
            ])
        );
    }

    #[test]
    fn projection_continues_through_nested_fields() {
        let record = json!({"items": [
            {"product": {"brand": "acme"}},
            {"product": {"brand": "globex"}}
        ]});
        let acme = json!("acme");
        let globex = json!("globex");
        assert_eq!(
            resolve("items.product.brand", &record),
            Resolved::Projection(vec![Resolved::Found(&acme), Resolved::Found(&globex)])
        );
    }

    #[test]
    fn array_elements_answer_numeric_segments() {
        let record = json!({"orders": [["x", "y"], ["z"]]});
        let x = json!("x");
        let z = json!("z");
        assert_eq!(
            resolve("orders.0", &record),
            Resolved::Projection(vec![Resolved::Found(&x), Resolved::Found(&z)])
        );
    }

    #[test]
    fn projected_strings_answer_index_and_length() {
        let record = json!({"items": [{"sku": "AB-1"}, {"sku": "C"}, {"qty": 2}]});
        assert_eq!(
            resolve("items.sku.0", &record),
            Resolved::Projection(vec![
                Resolved::Computed(json!("A")),
                Resolved::Computed(json!("C")),
                Resolved::Missing,
            ])
        );
        assert_eq!(
            resolve("items.sku.length", &record),
            Resolved::Projection(vec![
                Resolved::Computed(json!(4)),
                Resolved::Computed(json!(1)),
                Resolved::Missing,
            ])
        );
        assert_eq!(
            resolve("items.sku.9", &record),
            Resolved::Projection(vec![Resolved::Missing, Resolved::Missing, Resolved::Missing])
        );
    }

    #[test]
    fn projected_arrays_answer_length() {
        let record = json!({"orders": [{"lines": [1, 2, 3]}, {"lines": []}]});
        assert_eq!(
            resolve("orders.lines.length", &record),
            Resolved::Projection(vec![Resolved::Computed(json!(3)), Resolved::Computed(json!(0))])
        );
    }

    #[test]
    fn top_level_strings_have_no_members() {
        let record = json!({"code": "abc"});
        assert_eq!(resolve("code.0", &record), Resolved::Missing);
        assert_eq!(resolve("code.length", &record), Resolved::Missing);
    }

    #[test]
    fn null_counts_as_absent() {
        let record = json!({"coupon": null, "items": []});
        assert!(resolve("coupon", &record).is_absent());
        assert!(!resolve("items", &record).is_absent());
        assert!(resolve("items", &record).is_sequence());
    }
}
