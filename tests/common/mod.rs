use resume_pdf::resume::{Education, Experience, Project, Resume, Skill};

/// Route `log` output through the test harness capture.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small resume that fits comfortably on one page in either mode.
pub fn sample_resume() -> Resume {
    Resume {
        user_id: "u1".into(),
        email: "jane@example.dev".into(),
        first_name: "Jane".into(),
        last_name: Some("Doe".into()),
        phone: Some("716-555-1234".into()),
        linkedin_url: Some("https://linkedin.com/in/janedoe".into()),
        portfolio_url: Some("https://janedoe.dev".into()),
        education: vec![Education {
            education_id: "e1".into(),
            institution_name: "University at Buffalo".into(),
            degree: "Master of Science".into(),
            field_of_study: Some("Computer Science".into()),
            start_date: Some("Aug. 2023".into()),
            graduation_date: Some("Dec. 2025".into()),
        }],
        work_experience: vec![Experience {
            work_ex_id: "w1".into(),
            job_title: "Software Developer".into(),
            company_name: "Acme".into(),
            location: Some("Buffalo, NY".into()),
            start_date: Some("Jun. 2021".into()),
            end_date: Some("Jul. 2023".into()),
            description_bullets: vec![
                "Developed and maintained enterprise applications".into(),
                "Collaborated with cross-functional teams".into(),
            ],
            score: None,
        }],
        projects: vec![Project {
            project_id: "p1".into(),
            project_name: "Pathfinding Visualizer".into(),
            repository_url: Some("https://github.com/janedoe/pathfinder".into()),
            description_bullets: vec!["Built a tool to visualize shortest-path search".into()],
            score: None,
        }],
        skills: vec![
            Skill {
                skill_id: "s1".into(),
                skill_name: "Python".into(),
                category: Some("Language".into()),
            },
            Skill {
                skill_id: "s2".into(),
                skill_name: "React".into(),
                category: Some("Framework".into()),
            },
        ],
    }
}

/// A resume with enough experience entries to overflow a single page.
pub fn oversized_resume(entries: usize) -> Resume {
    let mut resume = sample_resume();
    resume.work_experience = (0..entries)
        .map(|i| Experience {
            work_ex_id: format!("w{i}"),
            job_title: format!("Engineer {i}"),
            company_name: "Acme".into(),
            location: None,
            start_date: Some("Jan. 2020".into()),
            end_date: Some("Dec. 2020".into()),
            description_bullets: vec![
                "Shipped a series of internal services handling ingestion, validation, \
                 transformation, and delivery of customer data across regions"
                    .into(),
                "Reduced infrastructure cost by consolidating redundant batch pipelines \
                 into a single streaming path with backpressure"
                    .into(),
                "Mentored junior engineers and ran the on-call rotation".into(),
            ],
            score: None,
        })
        .collect();
    resume
}
