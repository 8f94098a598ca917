// Prompt templates and output schemas for the extraction tasks.
// Placeholders use `{{name}}`; see extraction::template.

use crate::extraction::template::{ExtractionTask, FieldKind, SchemaField, TaskKind};

/// Job description analysis prompt. Bind `{{job_description}}` before sending.
pub const JOB_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"You are a professional HR analyst. Analyze the following job description and extract its key elements in a structured format.

Job Description:
{{job_description}}

Cover these sections:
1. Job Title (the main position title)
2. Required Skills (all technical and soft skills)
3. Required Experience (years and specific types of experience)
4. Required Qualifications (education, certifications, licenses)
5. Job Responsibilities (key duties and expectations)
6. Key Requirements (any other critical requirements)
7. Company Information (any details about the company)
8. Job Location and Type (remote/hybrid/onsite, full-time/part-time)
9. Job Settings (application deadline, max candidates, interview time slots)

Return a JSON object in exactly this format:
{
  "jobTitle": "job title extracted from the description",
  "name": "company name if present, otherwise null",
  "website": "company website if present, otherwise null",
  "industry": "company industry if present, otherwise null",
  "size": "company size if present, otherwise null",
  "founded": "year the company was founded if present, otherwise null",
  "description": "company description if present, otherwise null",
  "requiredSkills": ["skill1", "skill2"],
  "requiredExperience": "years and specific types of experience",
  "requiredQualifications": ["education", "certifications", "licenses"],
  "jobResponsibilities": ["responsibility1", "responsibility2"],
  "keyRequirements": ["requirement1", "requirement2"],
  "companyInformation": ["information1", "information2"],
  "jobLocationAndType": {
    "location": "location of the job",
    "type": "remote/hybrid/onsite",
    "time": "full-time/part-time"
  },
  "applicationDeadline": "ISO 8601 date for the application deadline",
  "maxCandidates": 10,
  "interviewTimeSlots": [
    {
      "startTime": "ISO 8601 slot start time",
      "endTime": "ISO 8601 slot end time",
      "isAvailable": true
    }
  ]
}

Instructions:
- Extract the job title carefully; it must be the main position being advertised.
- For company information, extract the vision, mission and values if present, otherwise any information about the company. Each list element must be a complete sentence.
- If settings are not mentioned in the job description:
  - set the application deadline to 30 days from now
  - set max candidates to 10
  - leave interview time slots empty; the recruiter sets them

Ensure all extracted information is specific and detailed."#;

/// Resume analysis prompt. Bind `{{resume_text}}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are a professional resume analyst. Analyze the following resume and extract comprehensive information.

Resume Content:
{{resume_text}}

Cover these sections:
1. Education (institutions, degrees, majors, graduation dates, GPA if available)
2. Work Experience (companies, positions, dates, key responsibilities, achievements)
3. Skills (technical skills, soft skills, tools, languages)
4. Certifications (names, issuing organizations, dates)
5. Key Achievements (quantifiable accomplishments)
6. Projects (technologies used and outcomes)
7. Miscellaneous Information (anything else relevant)
8. Contact Information (email, phone, location)

Return a JSON object in exactly this format:
{
  "education": [
    {
      "institution": "name of the institution if available",
      "degree": "degree if available",
      "major": "major if available",
      "graduationDate": "graduation date (YYYY-MM-DD) if available",
      "gpa": "GPA if available"
    }
  ],
  "workExperience": [
    {
      "company": "name of the company",
      "position": "position",
      "dates": "dates (YYYY-MM-DD) if available",
      "keyResponsibilities": ["responsibility1", "responsibility2"],
      "achievements": ["achievement1", "achievement2"]
    }
  ],
  "skills": ["skill1", "skill2"],
  "certifications": ["certification1", "certification2"],
  "keyAchievements": ["achievement1", "achievement2"],
  "miscellaneous": ["item1", "item2"],
  "projects": [
    {
      "name": "name of the project",
      "points": ["point1", "point2"]
    }
  ],
  "contactInformation": {
    "email": "email",
    "phone": "phone",
    "location": "location"
  }
}

Ensure all extracted information is specific and detailed."#;

const JOB_DESCRIPTION_SCHEMA: &[SchemaField] = &[
    SchemaField::new("jobTitle", FieldKind::Text),
    SchemaField::new("name", FieldKind::Text),
    SchemaField::new("website", FieldKind::Text),
    SchemaField::new("industry", FieldKind::Text),
    SchemaField::new("size", FieldKind::Text),
    SchemaField::new("founded", FieldKind::Text),
    SchemaField::new("description", FieldKind::Text),
    SchemaField::new("requiredSkills", FieldKind::TextList),
    SchemaField::new("requiredExperience", FieldKind::Text),
    SchemaField::new("requiredQualifications", FieldKind::TextList),
    SchemaField::new("jobResponsibilities", FieldKind::TextList),
    SchemaField::new("keyRequirements", FieldKind::TextList),
    SchemaField::new("companyInformation", FieldKind::TextList),
    SchemaField::new("jobLocationAndType", FieldKind::Object),
    SchemaField::new("applicationDeadline", FieldKind::Text),
    SchemaField::new("maxCandidates", FieldKind::Number),
    SchemaField::new("interviewTimeSlots", FieldKind::ObjectList),
];

const RESUME_SCHEMA: &[SchemaField] = &[
    SchemaField::new("education", FieldKind::ObjectList),
    SchemaField::new("workExperience", FieldKind::ObjectList),
    SchemaField::new("skills", FieldKind::TextList),
    SchemaField::new("certifications", FieldKind::TextList),
    SchemaField::new("keyAchievements", FieldKind::TextList),
    SchemaField::new("miscellaneous", FieldKind::TextList),
    SchemaField::new("projects", FieldKind::ObjectList),
    SchemaField::new("contactInformation", FieldKind::Object),
];

pub const JOB_DESCRIPTION_TASK: ExtractionTask = ExtractionTask {
    kind: TaskKind::JobDescription,
    template: JOB_DESCRIPTION_PROMPT_TEMPLATE,
    input_placeholder: "job_description",
    schema: JOB_DESCRIPTION_SCHEMA,
};

pub const RESUME_TASK: ExtractionTask = ExtractionTask {
    kind: TaskKind::Resume,
    template: RESUME_PROMPT_TEMPLATE,
    input_placeholder: "resume_text",
    schema: RESUME_SCHEMA,
};
