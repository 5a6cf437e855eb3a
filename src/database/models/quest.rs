use serde_json::Value;

use crate::types::Document;

pub const TITLE_FIELD: &str = "title";
pub const COMPLETED_FIELD: &str = "completed";
pub const OBJECTIVES_FIELD: &str = "objectives";
pub const DESCR_FIELD: &str = "descr";

/// Loose truthiness of a JSON field: absent, null, false, 0, NaN and ""
/// are false, everything else is true.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// A stored quest document. Quests have whatever shape the client gave
/// them; only `objectives[].descr`, `objectives[].completed` and
/// `completed` are ever looked at, and only flipped flags are written.
#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    doc: Document,
}

impl Quest {
    pub fn from_document(doc: Document) -> Self {
        Self { doc }
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn is_completed(&self) -> bool {
        is_truthy(self.doc.get(COMPLETED_FIELD))
    }

    /// Mark every objective whose `descr` is the string `descr` complete,
    /// then complete the quest if no objective is left open. The quest flag
    /// is only ever raised, never cleared. A quest without an `objectives`
    /// array is left as it is. Returns the number of objectives that matched.
    pub fn complete_objective(&mut self, descr: &str) -> usize {
        let Some(Value::Array(objectives)) = self.doc.get_mut(OBJECTIVES_FIELD) else {
            return 0;
        };

        let mut matched = 0;
        for objective in objectives.iter_mut().filter_map(Value::as_object_mut) {
            if objective.get(DESCR_FIELD).and_then(Value::as_str) == Some(descr) {
                objective.insert(COMPLETED_FIELD.to_string(), Value::Bool(true));
                matched += 1;
            }
        }

        // Non-object entries have no flag, so they count as open
        let all_done = objectives
            .iter()
            .all(|o| o.as_object().is_some_and(|o| is_truthy(o.get(COMPLETED_FIELD))));

        if all_done && self.doc.get(COMPLETED_FIELD) != Some(&Value::Bool(true)) {
            self.doc.insert(COMPLETED_FIELD.to_string(), Value::Bool(true));
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quest(v: Value) -> Quest {
        Quest::from_document(v.as_object().cloned().unwrap())
    }

    #[test]
    fn completing_last_objective_completes_quest() {
        let mut q = quest(json!({
            "_id": "q1",
            "title": "Q1",
            "completed": false,
            "objectives": [
                { "descr": "a", "completed": true },
                { "descr": "b", "completed": false }
            ]
        }));

        assert_eq!(q.complete_objective("b"), 1);
        assert!(q.is_completed());
        let doc = q.into_document();
        assert!(doc["objectives"].as_array().unwrap().iter().all(|o| o["completed"] == true));
    }

    #[test]
    fn completing_other_objective_leaves_quest_open() {
        let mut q = quest(json!({
            "title": "Q2",
            "completed": false,
            "objectives": [ { "descr": "a" }, { "descr": "b" } ]
        }));

        q.complete_objective("a");
        assert!(!q.is_completed());
        assert_eq!(q.complete_objective("zzz"), 0);

        let doc = q.into_document();
        assert_eq!(doc["objectives"][0]["completed"], true);
        assert!(doc["objectives"][1].get("completed").is_none());
        assert_eq!(doc["completed"], false);
    }

    #[test]
    fn no_keys_are_added_when_nothing_flips() {
        let original = json!({
            "title": "Bare",
            "objectives": [ { "descr": "a" }, { "descr": "b" } ]
        });
        let mut q = quest(original.clone());
        q.complete_objective("a");

        let doc = q.into_document();
        assert!(doc.get("completed").is_none());
        assert_eq!(doc["objectives"][1], original["objectives"][1]);
    }

    #[test]
    fn duplicate_descriptions_all_complete() {
        let mut q = quest(json!({
            "objectives": [ { "descr": "x" }, { "descr": "x" }, { "descr": "y", "completed": true } ]
        }));
        assert_eq!(q.complete_objective("x"), 2);
        assert!(q.is_completed());
    }

    #[test]
    fn completed_flag_is_never_cleared() {
        let mut q = quest(json!({
            "completed": true,
            "objectives": [ { "descr": "a", "completed": false } ]
        }));
        q.complete_objective("missing");
        assert!(q.is_completed());
    }

    #[test]
    fn loose_shapes_are_handled() {
        // Non-string title and null completion flag
        let mut q = quest(json!({
            "_id": "t",
            "title": 42,
            "completed": null,
            "objectives": [ { "descr": "a", "completed": 0 } ]
        }));
        assert_eq!(q.complete_objective("a"), 1);
        let doc = q.into_document();
        assert_eq!(doc["completed"], true);
        assert_eq!(doc["title"], 42);

        // Numeric descr never matches a string parameter
        let mut q = quest(json!({ "objectives": [ { "descr": 7 }, { "descr": "a" } ] }));
        assert_eq!(q.complete_objective("a"), 1);
        assert!(!q.is_completed());

        // Truthy non-boolean flags count as done
        let mut q = quest(json!({ "objectives": [ { "descr": "a", "completed": "yes" }, { "descr": "b" } ] }));
        q.complete_objective("b");
        assert!(q.is_completed());

        // Non-object entries stay open
        let mut q = quest(json!({ "objectives": [ "a", { "descr": "a" } ] }));
        assert_eq!(q.complete_objective("a"), 1);
        assert!(!q.is_completed());
    }

    #[test]
    fn missing_or_non_array_objectives_change_nothing() {
        for doc in [json!({ "title": "None" }), json!({ "title": "Odd", "objectives": "nope" })] {
            let mut q = quest(doc.clone());
            assert_eq!(q.complete_objective("a"), 0);
            assert_eq!(Value::Object(q.into_document()), doc);
        }
    }

    #[test]
    fn empty_objectives_complete_the_quest() {
        let mut q = quest(json!({ "objectives": [] }));
        q.complete_objective("anything");
        assert!(q.is_completed());
    }

    #[test]
    fn truthiness() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(Some(&v)), "{}", v);
        }
        for v in [json!(true), json!(1), json!("no"), json!([]), json!({})] {
            assert!(is_truthy(Some(&v)), "{}", v);
        }
        assert!(!is_truthy(None));
    }
}
