//! Job description summarizer — turns a free-text posting into pre-filled job fields.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::fields::{
    object, objects, opt_bool, opt_datetime, opt_text, opt_u32, text, text_list,
};
use crate::extraction::pipeline::{run_extraction, ExtractionError};
use crate::extraction::prompts::JOB_DESCRIPTION_TASK;
use crate::llm_client::CompletionClient;

/// Applied when the posting does not state a limit.
pub const DEFAULT_MAX_CANDIDATES: u32 = 10;
/// Days from now until the application deadline when none is stated.
pub const DEFAULT_DEADLINE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkplaceType {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkplaceType {
    /// Accepts the spellings models tend to produce ("On-site", "In Office", ...).
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match normalized.as_str() {
            "remote" | "fullyremote" | "wfh" => Some(WorkplaceType::Remote),
            "hybrid" => Some(WorkplaceType::Hybrid),
            "onsite" | "inoffice" | "office" | "inperson" => Some(WorkplaceType::Onsite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentTime {
    FullTime,
    PartTime,
}

impl EmploymentTime {
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match normalized.as_str() {
            "fulltime" | "full" => Some(EmploymentTime::FullTime),
            "parttime" | "part" => Some(EmploymentTime::PartTime),
            _ => None,
        }
    }
}

/// Company fields. Serialized flat alongside the job fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub name: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub founded: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLocationAndType {
    pub location: String,
    #[serde(rename = "type")]
    pub workplace: Option<WorkplaceType>,
    pub time: Option<EmploymentTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_available: bool,
}

/// Structured job posting fields extracted from a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionSummary {
    pub job_title: String,
    #[serde(flatten)]
    pub company: CompanyDetails,
    pub required_skills: Vec<String>,
    pub required_experience: String,
    pub required_qualifications: Vec<String>,
    pub job_responsibilities: Vec<String>,
    pub key_requirements: Vec<String>,
    pub company_information: Vec<String>,
    pub job_location_and_type: JobLocationAndType,
    pub application_deadline: DateTime<Utc>,
    pub max_candidates: u32,
    pub interview_time_slots: Vec<InterviewTimeSlot>,
}

impl JobDescriptionSummary {
    /// Maps parsed model output field by field, filling defaults relative to `now`.
    pub fn from_value(value: &Value, now: DateTime<Utc>) -> Self {
        let location = object(value, "jobLocationAndType");

        JobDescriptionSummary {
            job_title: text(value, "jobTitle"),
            company: CompanyDetails {
                name: opt_text(value, "name"),
                website: opt_text(value, "website"),
                industry: opt_text(value, "industry"),
                size: opt_text(value, "size"),
                founded: opt_text(value, "founded"),
                description: opt_text(value, "description"),
            },
            required_skills: text_list(value, "requiredSkills"),
            required_experience: text(value, "requiredExperience"),
            required_qualifications: text_list(value, "requiredQualifications"),
            job_responsibilities: text_list(value, "jobResponsibilities"),
            key_requirements: text_list(value, "keyRequirements"),
            company_information: text_list(value, "companyInformation"),
            job_location_and_type: JobLocationAndType {
                location: text(location, "location"),
                workplace: opt_text(location, "type")
                    .as_deref()
                    .and_then(WorkplaceType::parse_loose),
                time: opt_text(location, "time")
                    .as_deref()
                    .and_then(EmploymentTime::parse_loose),
            },
            application_deadline: opt_datetime(value, "applicationDeadline")
                .unwrap_or_else(|| now + Duration::days(DEFAULT_DEADLINE_DAYS)),
            max_candidates: opt_u32(value, "maxCandidates")
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_CANDIDATES),
            interview_time_slots: objects(value, "interviewTimeSlots")
                .filter_map(|slot| {
                    Some(InterviewTimeSlot {
                        start_time: opt_datetime(slot, "startTime")?,
                        end_time: opt_datetime(slot, "endTime")?,
                        is_available: opt_bool(slot, "isAvailable").unwrap_or(true),
                    })
                })
                .collect(),
        }
    }
}

/// Extracts structured job fields from a raw job description.
pub async fn summarise_job_description(
    job_description: &str,
    client: &dyn CompletionClient,
) -> Result<JobDescriptionSummary, ExtractionError> {
    let value = run_extraction(&JOB_DESCRIPTION_TASK, job_description, client).await?;
    Ok(JobDescriptionSummary::from_value(&value, Utc::now()))
}
