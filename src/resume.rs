//! Resume data model and preview-tree generation.
//!
//! The structs deserialize the stored resume JSON as-is. The two tree
//! builders turn a resume into the styled [`ContentNode`] tree the renderer
//! consumes: `master_preview_tree` lays out the full resume, while
//! `tailored_preview_tree` substitutes the job-ranked experience and project
//! selections and leaves everything else in place.

use serde::{Deserialize, Serialize};

use crate::model::{ContentNode, FontSizeClass};

const EN_DASH: &str = "\u{2013}";
const EM_DASH: &str = "\u{2014}";
const PART_SEPARATOR: &str = " \u{2022} ";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Resume {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub work_experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Education {
    pub education_id: String,
    pub institution_name: String,
    pub degree: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Experience {
    pub work_ex_id: String,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description_bullets: Vec<String>,
    /// Relevance score attached by the ranking endpoint. Absent on the
    /// master resume.
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Project {
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub description_bullets: Vec<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Skill {
    pub skill_id: String,
    pub skill_name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Job-tailored selection: the highest-scoring experiences and projects,
/// already sorted by score descending.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RankedItems {
    #[serde(default)]
    pub top_work_experiences: Vec<Experience>,
    #[serde(default)]
    pub top_projects: Vec<Project>,
}

impl Resume {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// Styled preview tree for the full master resume.
pub fn master_preview_tree(resume: &Resume) -> ContentNode {
    build_tree(resume, &resume.work_experience, &resume.projects)
}

/// Styled preview tree with the ranked experience and project selections in
/// place of the master lists. Education and skills are kept unchanged.
pub fn tailored_preview_tree(resume: &Resume, ranked: &RankedItems) -> ContentNode {
    build_tree(resume, &ranked.top_work_experiences, &ranked.top_projects)
}

fn build_tree(resume: &Resume, experience: &[Experience], projects: &[Project]) -> ContentNode {
    let mut root = ContentNode::block()
        .with_child(
            ContentNode::block()
                .with_text(resume.full_name())
                .with_size(FontSizeClass::Name)
                .bold()
                .centered(),
        )
        .with_child(contact_line(resume));

    if !resume.education.is_empty() {
        root = root.with_child(section_header("Education"));
        for edu in &resume.education {
            root = root.with_child(education_entry(edu));
        }
    }

    if !experience.is_empty() {
        root = root.with_child(section_header("Experience"));
        for exp in experience {
            root = root.with_child(experience_entry(exp));
        }
    }

    if !projects.is_empty() {
        root = root.with_child(section_header("Projects"));
        for project in projects {
            root = root.with_child(project_entry(project));
        }
    }

    if !resume.skills.is_empty() {
        root = root.with_child(section_header("Skills"));
        root = root.with_child(skills_block(&resume.skills));
    }

    root
}

fn section_header(title: &str) -> ContentNode {
    ContentNode::block()
        .with_text(title)
        .with_size(FontSizeClass::Section)
        .bold()
        .underlined()
}

/// One muted, centered line of contact parts joined with bullet separators.
/// URLs are shown without their scheme; the renderer restores it when it
/// builds the link target.
fn contact_line(resume: &Resume) -> ContentNode {
    let mut parts: Vec<String> = vec![resume.email.clone()];
    if let Some(phone) = resume.phone.as_deref().filter(|p| !p.is_empty()) {
        parts.push(phone.to_string());
    }
    for url in [&resume.linkedin_url, &resume.portfolio_url] {
        if let Some(url) = url.as_deref().filter(|u| !u.is_empty()) {
            parts.push(display_url(url));
        }
    }
    ContentNode::block()
        .with_text(parts.join(PART_SEPARATOR))
        .with_size(FontSizeClass::Small)
        .muted()
        .centered()
}

fn display_url(url: &str) -> String {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
        .trim_end_matches('/')
        .to_string()
}

fn date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (
        start.filter(|s| !s.is_empty()),
        end.filter(|e| !e.is_empty()),
    ) {
        (Some(start), Some(end)) => Some(format!("{start} {EN_DASH} {end}")),
        (Some(start), None) => Some(format!("{start} {EN_DASH} Present")),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    }
}

fn education_entry(edu: &Education) -> ContentNode {
    let mut entry = ContentNode::block().with_child(
        ContentNode::block()
            .with_text(&edu.institution_name)
            .with_size(FontSizeClass::Title)
            .bold(),
    );

    let degree = match edu.field_of_study.as_deref().filter(|f| !f.is_empty()) {
        Some(field) => format!("{}, {field}", edu.degree),
        None => edu.degree.clone(),
    };
    if !degree.is_empty() {
        entry = entry.with_child(ContentNode::block().with_text(degree));
    }

    if let Some(dates) = date_range(edu.start_date.as_deref(), edu.graduation_date.as_deref()) {
        entry = entry.with_child(
            ContentNode::block()
                .with_text(dates)
                .with_size(FontSizeClass::Meta)
                .muted(),
        );
    }
    entry
}

fn experience_entry(exp: &Experience) -> ContentNode {
    let mut entry = ContentNode::block().with_child(
        ContentNode::block()
            .with_text(format!("{} {EM_DASH} {}", exp.job_title, exp.company_name))
            .with_size(FontSizeClass::Title)
            .bold(),
    );

    let mut meta = date_range(exp.start_date.as_deref(), exp.end_date.as_deref());
    if let Some(location) = exp.location.as_deref().filter(|l| !l.is_empty()) {
        meta = Some(match meta {
            Some(dates) => format!("{dates}, {location}"),
            None => location.to_string(),
        });
    }
    if let Some(meta) = meta {
        entry = entry.with_child(
            ContentNode::block()
                .with_text(meta)
                .with_size(FontSizeClass::Meta)
                .muted(),
        );
    }

    entry.with_child(bullet_list(&exp.description_bullets))
}

fn project_entry(project: &Project) -> ContentNode {
    let mut entry = ContentNode::block().with_child(
        ContentNode::block()
            .with_text(&project.project_name)
            .with_size(FontSizeClass::Title)
            .bold(),
    );

    if let Some(url) = project.repository_url.as_deref().filter(|u| !u.is_empty()) {
        entry = entry.with_child(
            ContentNode::block()
                .with_text(display_url(url))
                .with_size(FontSizeClass::Meta)
                .muted(),
        );
    }

    entry.with_child(bullet_list(&project.description_bullets))
}

fn bullet_list(bullets: &[String]) -> ContentNode {
    ContentNode::list().with_children(
        bullets
            .iter()
            .filter(|b| !b.trim().is_empty())
            .map(ContentNode::list_item),
    )
}

/// One labeled row per skill category, in first-seen category order.
/// Uncategorized skills collect under "Other".
fn skills_block(skills: &[Skill]) -> ContentNode {
    let mut categories: Vec<(String, Vec<&str>)> = Vec::new();
    for skill in skills {
        if skill.skill_name.trim().is_empty() {
            continue;
        }
        let category = skill
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("Other");
        match categories.iter_mut().find(|(name, _)| name == category) {
            Some((_, names)) => names.push(&skill.skill_name),
            None => categories.push((category.to_string(), vec![&skill.skill_name])),
        }
    }

    ContentNode::block().with_children(categories.into_iter().map(|(category, names)| {
        ContentNode::block()
            .with_child(ContentNode::inline_span(format!("{category}:")).bold())
            .with_child(ContentNode::inline_span(names.join(", ")))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Role, classify};

    fn sample() -> Resume {
        Resume {
            user_id: "u1".into(),
            email: "jane@example.dev".into(),
            first_name: "Jane".into(),
            last_name: Some("Doe".into()),
            phone: Some("716-555-1234".into()),
            linkedin_url: Some("https://linkedin.com/in/janedoe".into()),
            portfolio_url: None,
            work_experience: vec![Experience {
                work_ex_id: "w1".into(),
                job_title: "Engineer".into(),
                company_name: "Acme".into(),
                location: Some("Oslo".into()),
                start_date: Some("Jun. 2021".into()),
                end_date: None,
                description_bullets: vec!["Did things".into(), "  ".into()],
                score: None,
            }],
            projects: vec![],
            education: vec![Education {
                education_id: "e1".into(),
                institution_name: "University at Buffalo".into(),
                degree: "Master of Science".into(),
                field_of_study: Some("Computer Science".into()),
                start_date: None,
                graduation_date: Some("Dec. 2025".into()),
            }],
            skills: vec![
                Skill {
                    skill_id: "s1".into(),
                    skill_name: "Python".into(),
                    category: Some("Language".into()),
                },
                Skill {
                    skill_id: "s2".into(),
                    skill_name: "Rust".into(),
                    category: Some("Language".into()),
                },
                Skill {
                    skill_id: "s3".into(),
                    skill_name: "Docker".into(),
                    category: None,
                },
            ],
        }
    }

    #[test]
    fn name_header_classifies_as_name() {
        let tree = master_preview_tree(&sample());
        assert_eq!(classify(&tree.children[0]), Role::NameHeader);
        assert_eq!(tree.children[0].rendered_text(), "Jane Doe");
    }

    #[test]
    fn contact_line_joins_parts_and_strips_schemes() {
        let tree = master_preview_tree(&sample());
        let contact = &tree.children[1];
        assert_eq!(classify(contact), Role::ContactLine);
        assert_eq!(
            contact.rendered_text(),
            "jane@example.dev \u{2022} 716-555-1234 \u{2022} linkedin.com/in/janedoe"
        );
    }

    #[test]
    fn empty_sections_are_omitted() {
        let tree = master_preview_tree(&sample());
        let headers: Vec<String> = tree
            .children
            .iter()
            .filter(|n| classify(n) == Role::SectionHeader)
            .map(ContentNode::rendered_text)
            .collect();
        assert_eq!(headers, vec!["Education", "Experience", "Skills"]);
    }

    #[test]
    fn open_ended_dates_render_present() {
        let dates = date_range(Some("Jun. 2021"), None).unwrap();
        assert_eq!(dates, "Jun. 2021 \u{2013} Present");
    }

    #[test]
    fn blank_bullets_are_dropped() {
        let list = bullet_list(&["Did things".into(), "  ".into()]);
        assert_eq!(list.children.len(), 1);
    }

    #[test]
    fn skills_group_in_first_seen_order() {
        let tree = master_preview_tree(&sample());
        let block = tree.children.last().unwrap();
        assert_eq!(block.children.len(), 2);
        let first = &block.children[0];
        assert_eq!(classify(first), Role::LabeledRow);
        assert_eq!(first.children[0].rendered_text(), "Language:");
        assert_eq!(first.children[1].rendered_text(), "Python, Rust");
        assert_eq!(block.children[1].children[0].rendered_text(), "Other:");
    }

    #[test]
    fn tailored_tree_swaps_ranked_lists() {
        let resume = sample();
        let ranked = RankedItems {
            top_work_experiences: vec![],
            top_projects: vec![Project {
                project_id: "p1".into(),
                project_name: "Visualizer".into(),
                repository_url: Some("https://github.com/jane/viz".into()),
                description_bullets: vec!["Built it".into()],
                score: Some(0.91),
            }],
        };
        let tree = tailored_preview_tree(&resume, &ranked);
        let headers: Vec<String> = tree
            .children
            .iter()
            .filter(|n| classify(n) == Role::SectionHeader)
            .map(ContentNode::rendered_text)
            .collect();
        assert_eq!(headers, vec!["Education", "Projects", "Skills"]);
    }

    #[test]
    fn deserializes_stored_resume_json() {
        let json = r#"{
            "user_id": "u1",
            "email": "jane@example.dev",
            "first_name": "Jane",
            "work_experience": [{
                "work_ex_id": "w1",
                "job_title": "Engineer",
                "company_name": "Acme",
                "description_bullets": ["Did things"]
            }]
        }"#;
        let resume: Resume = serde_json::from_str(json).unwrap();
        assert_eq!(resume.full_name(), "Jane");
        assert_eq!(resume.work_experience.len(), 1);
        assert!(resume.work_experience[0].score.is_none());
    }
}
