//! Maps the form's free-text question labels onto the fixed set of
//! submission fields. The remote schema is dynamic (question ids change
//! per form), so the mapping is rebuilt from the question definitions on
//! every sync; the labels themselves are a static table.

use std::collections::HashMap;

use crate::typeform::models::{FormResponse, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionField {
    Name,
    FoundedYear,
    WebAddress,
    Twitter,
    LogoUrl,
    ContactName,
    ContactEmail,
}

impl SubmissionField {
    pub const ALL: [SubmissionField; 7] = [
        Self::Name,
        Self::FoundedYear,
        Self::WebAddress,
        Self::Twitter,
        Self::LogoUrl,
        Self::ContactName,
        Self::ContactEmail,
    ];

    /// The exact question label this field is matched against.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Startup name",
            Self::FoundedYear => "Year founded",
            Self::WebAddress => "Web address",
            Self::Twitter => "Twitter handle",
            Self::LogoUrl => "URL to high-resolution (white) logo",
            Self::ContactName => "Contact person",
            Self::ContactEmail => "Contact email address",
        }
    }
}

/// Field-name → question-id mapping built from one fetch's question
/// definitions. Labels that match nothing are ignored; expected labels
/// that are absent simply leave the field unmapped.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    ids: HashMap<SubmissionField, String>,
}

impl FieldMap {
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut ids = HashMap::new();
        for question in questions {
            for field in SubmissionField::ALL {
                if question.question == field.label() {
                    ids.insert(field, question.id.clone());
                }
            }
        }
        Self { ids }
    }

    pub fn id(&self, field: SubmissionField) -> Option<&str> {
        self.ids.get(&field).map(String::as_str)
    }

    /// Look up a response's answer for a semantic field. Unmapped fields
    /// and missing answers both yield `None`.
    pub fn answer(&self, field: SubmissionField, response: &FormResponse) -> Option<String> {
        let id = self.ids.get(&field)?;
        response.answers.get(id).cloned()
    }

    /// Expected fields the remote form did not define, for logging.
    pub fn missing(&self) -> Vec<SubmissionField> {
        SubmissionField::ALL
            .into_iter()
            .filter(|f| !self.ids.contains_key(f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeform::models::ResponseMetadata;

    fn question(id: &str, label: &str) -> Question {
        Question {
            id: id.to_string(),
            question: label.to_string(),
        }
    }

    fn all_questions() -> Vec<Question> {
        vec![
            question("q1", "Startup name"),
            question("q2", "Year founded"),
            question("q3", "Web address"),
            question("q4", "Twitter handle"),
            question("q5", "URL to high-resolution (white) logo"),
            question("q6", "Contact person"),
            question("q7", "Contact email address"),
        ]
    }

    #[test]
    fn maps_every_recognized_label() {
        let map = FieldMap::from_questions(&all_questions());
        assert_eq!(map.id(SubmissionField::Name), Some("q1"));
        assert_eq!(map.id(SubmissionField::FoundedYear), Some("q2"));
        assert_eq!(map.id(SubmissionField::WebAddress), Some("q3"));
        assert_eq!(map.id(SubmissionField::Twitter), Some("q4"));
        assert_eq!(map.id(SubmissionField::LogoUrl), Some("q5"));
        assert_eq!(map.id(SubmissionField::ContactName), Some("q6"));
        assert_eq!(map.id(SubmissionField::ContactEmail), Some("q7"));
        assert!(map.missing().is_empty());
    }

    #[test]
    fn mapping_is_order_independent() {
        let mut questions = all_questions();
        questions.reverse();
        let map = FieldMap::from_questions(&questions);
        assert_eq!(map.id(SubmissionField::Name), Some("q1"));
        assert_eq!(map.id(SubmissionField::ContactEmail), Some("q7"));
    }

    #[test]
    fn unrecognized_labels_are_ignored() {
        let questions = vec![
            question("q1", "Startup name"),
            question("qx", "Favourite colour"),
            question("qy", "startup name"), // case-sensitive, no match
        ];
        let map = FieldMap::from_questions(&questions);
        assert_eq!(map.id(SubmissionField::Name), Some("q1"));
        assert_eq!(map.missing().len(), 6);
    }

    #[test]
    fn absent_label_leaves_field_unmapped() {
        let questions = vec![question("q1", "Startup name")];
        let map = FieldMap::from_questions(&questions);
        assert_eq!(map.id(SubmissionField::Twitter), None);
        assert!(map.missing().contains(&SubmissionField::Twitter));
    }

    #[test]
    fn answer_lookup_handles_missing_values() {
        let map = FieldMap::from_questions(&all_questions());
        let response = FormResponse {
            metadata: ResponseMetadata {
                date_land: "2015-03-01 10:00:00".to_string(),
            },
            answers: [("q1".to_string(), "Acme".to_string())].into_iter().collect(),
        };

        assert_eq!(map.answer(SubmissionField::Name, &response).as_deref(), Some("Acme"));
        // Mapped field, no answer in this response
        assert_eq!(map.answer(SubmissionField::Twitter, &response), None);

        // Unmapped field
        let empty_map = FieldMap::from_questions(&[]);
        assert_eq!(empty_map.answer(SubmissionField::Name, &response), None);
    }
}
