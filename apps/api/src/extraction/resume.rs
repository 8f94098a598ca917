//! Resume analyzer — turns plain resume text into structured applicant fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::fields::{object, objects, opt_text, text, text_list};
use crate::extraction::pipeline::{run_extraction, ExtractionError};
use crate::extraction::prompts::RESUME_TASK;
use crate::llm_client::CompletionClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub dates: Option<String>,
    pub key_responsibilities: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInformation {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Structured applicant fields extracted from a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub key_achievements: Vec<String>,
    pub miscellaneous: Vec<String>,
    pub projects: Vec<Project>,
    pub contact_information: ContactInformation,
}

impl ResumeAnalysis {
    pub fn from_value(value: &Value) -> Self {
        let contact = object(value, "contactInformation");

        ResumeAnalysis {
            education: objects(value, "education")
                .map(|e| Education {
                    institution: opt_text(e, "institution"),
                    degree: opt_text(e, "degree"),
                    major: opt_text(e, "major"),
                    graduation_date: opt_text(e, "graduationDate"),
                    gpa: opt_text(e, "gpa"),
                })
                .collect(),
            work_experience: objects(value, "workExperience")
                .map(|w| WorkExperience {
                    company: text(w, "company"),
                    position: text(w, "position"),
                    dates: opt_text(w, "dates"),
                    key_responsibilities: text_list(w, "keyResponsibilities"),
                    achievements: text_list(w, "achievements"),
                })
                .collect(),
            skills: text_list(value, "skills"),
            certifications: text_list(value, "certifications"),
            key_achievements: text_list(value, "keyAchievements"),
            miscellaneous: text_list(value, "miscellaneous"),
            projects: objects(value, "projects")
                .map(|p| Project {
                    name: text(p, "name"),
                    points: text_list(p, "points"),
                })
                .collect(),
            contact_information: ContactInformation {
                email: opt_text(contact, "email"),
                phone: opt_text(contact, "phone"),
                location: opt_text(contact, "location"),
            },
        }
    }
}

/// Extracts structured applicant fields from plain resume text.
pub async fn analyse_resume(
    resume_text: &str,
    client: &dyn CompletionClient,
) -> Result<ResumeAnalysis, ExtractionError> {
    let value = run_extraction(&RESUME_TASK, resume_text, client).await?;
    Ok(ResumeAnalysis::from_value(&value))
}
