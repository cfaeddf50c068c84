// Critique prompt templates.
// All prompts for the critique module are defined here.

pub const CRITIQUE_PROMPT_TEMPLATE: &str = r#"Act as an expert Resume Critique Bot with extensive experience in professional resume writing and HR. Analyze the provided resume and provide detailed feedback in the following structured format:

1. OVERALL IMPRESSION:
- Provide a brief overview of the resume's effectiveness
- Comment on the resume's organization and clarity

2. CONTENT ANALYSIS:
- Professional Experience
- Education
- Skills and Competencies
- Achievements and Impact
- Technical Proficiency

3. FORMATTING AND PRESENTATION:
- Layout and Design
- Use of Action Verbs
- Consistency
- Professional Tone

4. SPECIFIC RECOMMENDATIONS:
- List 3-5 concrete improvements
- Suggest better ways to phrase key experiences
- Recommend additional sections if needed

5. INDUSTRY ALIGNMENT:
- Evaluate market readiness
- Suggest industry-specific optimizations

6. SKILL ENHANCEMENT:
- Recommend relevant certifications
- Suggest courses for skill development
- Identify trending skills in the field

Resume:
{resume_text}
"#;

/// Appended only when the user supplied a job description.
pub const JOB_MATCH_SECTION_TEMPLATE: &str = r#"
7. JOB MATCH ANALYSIS:
- Compare resume against job requirements
- Identify missing key qualifications
- Suggest tailoring strategies

Job Description:
{job_description}
"#;
