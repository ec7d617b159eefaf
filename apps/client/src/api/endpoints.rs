//! Endpoint catalog. Paths are relative to the `/api/v1` base; the client
//! normalizes them, so a stray leading prefix here would still be harmless.

pub mod auth {
    pub const LOGIN: &str = "auth/login";
    pub const REGISTER: &str = "auth/register";
    pub const ME: &str = "auth/me";
}

pub mod resumes {
    pub const LIST: &str = "resumes";
    pub const CREATE: &str = "resumes";
    pub const UPLOAD: &str = "resumes/upload";

    pub fn detail(id: i64) -> String {
        format!("resumes/{id}")
    }
}

pub mod job_descriptions {
    pub const LIST: &str = "job-descriptions";
    pub const CREATE: &str = "job-descriptions";
    pub const UPLOAD: &str = "job-descriptions/upload";

    pub fn detail(id: i64) -> String {
        format!("job-descriptions/{id}")
    }
}

pub mod optimizations {
    pub const LIST: &str = "optimizations";
    pub const CREATE: &str = "optimizations";

    pub fn detail(id: i64) -> String {
        format!("optimizations/{id}")
    }

    pub fn export(id: i64) -> String {
        format!("optimizations/export/{id}")
    }
}

pub mod career_tools {
    use crate::models::optimization::ExportFormat;

    pub const GENERATE_COVER_LETTER: &str = "career-tools/generate-cover-letter-upload";
    pub const ANALYZE_SKILLS_GAP: &str = "career-tools/analyze-skills-gap";

    pub fn cover_letter(id: i64) -> String {
        format!("career-tools/cover-letter/{id}")
    }

    pub fn export_cover_letter(id: i64, format: ExportFormat) -> String {
        format!("career-tools/export-cover-letter/{id}?format={format}")
    }

    pub fn add_user_skills(analysis_id: i64) -> String {
        format!("career-tools/add-user-skills/{analysis_id}")
    }
}

pub mod payments {
    pub const VERIFY: &str = "payments/verify";
    pub const CREATE_CHECKOUT: &str = "payments/create-checkout-session";
}

pub mod users {
    pub const CREDITS: &str = "users/credits";
    pub const PURCHASE_CREDITS: &str = "users/credits/purchase";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::optimization::ExportFormat;

    #[test]
    fn test_parameterized_paths() {
        assert_eq!(resumes::detail(5), "resumes/5");
        assert_eq!(job_descriptions::detail(2), "job-descriptions/2");
        assert_eq!(optimizations::export(9), "optimizations/export/9");
        assert_eq!(career_tools::cover_letter(3), "career-tools/cover-letter/3");
        assert_eq!(
            career_tools::export_cover_letter(3, ExportFormat::Docx),
            "career-tools/export-cover-letter/3?format=docx"
        );
        assert_eq!(
            career_tools::add_user_skills(11),
            "career-tools/add-user-skills/11"
        );
    }
}
