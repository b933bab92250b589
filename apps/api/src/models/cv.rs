//! CV form data as submitted by the builder UI.
//!
//! The form, its validation, and template rendering all live client-side;
//! the server only needs this shape to flatten a CV into plain text for the
//! AI feedback gateway.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    #[serde(default)]
    pub photo: Option<String>,
    pub name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub website: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvData {
    pub personal_details: PersonalDetails,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl CvData {
    /// Flattens the CV into the plain-text form the feedback prompt expects.
    /// Empty sections are omitted entirely.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        let p = &self.personal_details;

        if !p.name.is_empty() {
            out.push_str(&format!("{} — {}\n", p.name, p.job_title));
        }
        for line in [&p.email, &p.phone, &p.address, &p.linkedin, &p.website] {
            if !line.is_empty() {
                out.push_str(line);
                out.push('\n');
            }
        }
        if !p.summary.is_empty() {
            out.push_str("\nSummary:\n");
            out.push_str(&p.summary);
            out.push('\n');
        }

        if !self.work_experience.is_empty() {
            out.push_str("\nWork Experience:\n");
            for w in &self.work_experience {
                out.push_str(&format!(
                    "- {} at {}, {} ({} to {})\n",
                    w.job_title, w.company, w.location, w.start_date, w.end_date
                ));
                if !w.description.is_empty() {
                    out.push_str(&format!("  {}\n", w.description));
                }
            }
        }

        if !self.education.is_empty() {
            out.push_str("\nEducation:\n");
            for e in &self.education {
                out.push_str(&format!(
                    "- {}, {}, {} ({} to {})\n",
                    e.degree, e.institution, e.location, e.start_date, e.end_date
                ));
                if !e.description.is_empty() {
                    out.push_str(&format!("  {}\n", e.description));
                }
            }
        }

        let skills: Vec<&str> = self
            .skills
            .iter()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
            .collect();
        if !skills.is_empty() {
            out.push_str("\nSkills: ");
            out.push_str(&skills.join(", "));
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cv() -> CvData {
        CvData {
            personal_details: PersonalDetails {
                photo: None,
                name: "Ada Lovelace".to_string(),
                job_title: "Software Engineer".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 1234".to_string(),
                address: "London".to_string(),
                linkedin: String::new(),
                website: String::new(),
                summary: "Engineer with an analytical bent.".to_string(),
            },
            work_experience: vec![WorkExperience {
                id: "w1".to_string(),
                job_title: "Analyst".to_string(),
                company: "Babbage & Co".to_string(),
                location: "London".to_string(),
                start_date: "1840".to_string(),
                end_date: "1843".to_string(),
                description: "Wrote the first program.".to_string(),
            }],
            education: vec![],
            skills: vec![
                Skill {
                    id: "s1".to_string(),
                    name: "Mathematics".to_string(),
                },
                Skill {
                    id: "s2".to_string(),
                    name: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_plain_text_contains_populated_sections() {
        let text = make_cv().to_plain_text();
        assert!(text.contains("Ada Lovelace — Software Engineer"));
        assert!(text.contains("Summary:"));
        assert!(text.contains("Analyst at Babbage & Co"));
        assert!(text.contains("Wrote the first program."));
    }

    #[test]
    fn test_plain_text_omits_empty_sections() {
        let text = make_cv().to_plain_text();
        assert!(!text.contains("Education:"));
    }

    #[test]
    fn test_plain_text_skips_blank_skills() {
        let text = make_cv().to_plain_text();
        assert!(text.contains("Skills: Mathematics"));
        assert!(!text.contains("Mathematics, "));
    }

    #[test]
    fn test_empty_cv_serializes_to_empty_text() {
        assert!(CvData::default().to_plain_text().is_empty());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let cv: CvData = serde_json::from_value(serde_json::json!({
            "personalDetails": {
                "name": "A",
                "jobTitle": "B",
                "email": "a@b.c",
                "phone": "1",
                "address": "X",
                "summary": "S"
            }
        }))
        .unwrap();
        assert_eq!(cv.personal_details.job_title, "B");
        assert!(cv.work_experience.is_empty());
    }
}
