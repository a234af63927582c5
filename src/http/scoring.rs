//! Heuristic scoring used by the development backend
//!
//! Deterministic stand-ins for the real scoring services: keyword overlap for
//! answers, keyword spotting for resumes.

use crate::emotion::EmotionLabel;
use std::collections::HashSet;

const SKILLS_KEYWORDS: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust", "swift",
    "react", "angular", "vue", "node.js", "django", "flask", "spring", "express",
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch",
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins",
    "machine learning", "deep learning", "artificial intelligence", "data science",
    "tensorflow", "pytorch", "scikit-learn", "pandas", "numpy",
    "html", "css", "sass", "tailwind", "bootstrap",
    "git", "github", "gitlab", "bitbucket", "jira", "agile", "scrum",
    "rest api", "graphql", "microservices", "devops", "ci/cd",
    "linux", "unix", "bash", "shell scripting",
    "communication", "leadership", "teamwork", "problem solving", "analytical",
    "project management", "time management", "critical thinking",
    "excel", "powerpoint", "word", "tableau", "power bi",
    "salesforce", "sap", "oracle", "photoshop", "figma", "sketch",
];

const COMMON_WORDS: &[&str] = &[
    "about", "yourself", "tell", "what", "your", "have", "been", "that", "with", "this",
    "from", "they", "would", "could", "should",
];

const QUALITY_INDICATORS: &[&str] = &[
    "because", "therefore", "for example", "specifically", "additionally", "however", "moreover",
];

const ACTION_WORDS: &[&str] = &[
    "achieved", "increased", "improved", "reduced", "led", "managed", "developed", "created",
];

const MAX_SKILLS: usize = 15;
const MAX_SUGGESTIONS: usize = 5;

fn keywords(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.chars().count() >= 4 && !COMMON_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// How well an answer addresses the question, in [30, 98]
pub fn semantic_score(answer: &str, question: &str) -> u32 {
    let answer = answer.trim();
    if answer.chars().count() < 10 {
        return 30;
    }

    let question_keywords = keywords(question);
    let answer_keywords = keywords(answer);
    let keyword_score = if question_keywords.is_empty() {
        50.0
    } else {
        let overlap = question_keywords.intersection(&answer_keywords).count();
        (overlap as f64 / question_keywords.len() as f64 * 100.0).min(100.0)
    };

    let length_score = (answer.split_whitespace().count() as f64 * 2.0).min(30.0);

    let lower = answer.to_lowercase();
    let quality_score = QUALITY_INDICATORS
        .iter()
        .filter(|i| lower.contains(*i))
        .count() as f64
        * 5.0;

    let base = 40.0 + keyword_score * 0.3 + length_score + quality_score.min(20.0);
    (base as u32).clamp(30, 98)
}

/// Delivery score from answer length, in [65, 95]
pub fn voice_score(answer: &str) -> u32 {
    (65 + answer.split_whitespace().count() as u32).min(95)
}

fn emotion_bonus(emotion: EmotionLabel) -> f64 {
    match emotion {
        EmotionLabel::Confident => 10.0,
        EmotionLabel::Happy => 5.0,
        EmotionLabel::Neutral => 0.0,
        EmotionLabel::Nervous => -5.0,
    }
}

/// Composite score, in [30, 98]
pub fn fuse_scores(semantic: u32, voice: u32, emotion: EmotionLabel, confidence: f32) -> u32 {
    let weighted = semantic as f64 * 0.5 + voice as f64 * 0.3 + confidence as f64 * 0.2;
    let score = (weighted + emotion_bonus(emotion)).round() as i64;
    score.clamp(30, 98) as u32
}

pub fn feedback(score: u32, emotion: EmotionLabel) -> String {
    let base = if score >= 85 {
        "Excellent response! Your answer was comprehensive and well-structured."
    } else if score >= 70 {
        "Good response. Consider adding more specific examples."
    } else if score >= 55 {
        "Decent attempt. Work on structuring your answer better."
    } else {
        "Keep practicing. Focus on answering the question directly."
    };

    match emotion {
        EmotionLabel::Nervous => format!("{} Remember to stay calm and take your time.", base),
        EmotionLabel::Confident => format!("{} Your confidence really shows!", base),
        _ => base.to_string(),
    }
}

fn title_case(skill: &str) -> String {
    if skill.chars().count() <= 3 {
        return skill.to_uppercase();
    }
    let mut out = String::with_capacity(skill.len());
    let mut word_start = true;
    for c in skill.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

pub fn detect_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for skill in SKILLS_KEYWORDS {
        if lower.contains(skill) {
            let formatted = title_case(skill);
            if !found.contains(&formatted) {
                found.push(formatted);
            }
        }
    }
    found.truncate(MAX_SKILLS);
    found
}

pub fn detect_experience_years(text: &str) -> u32 {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    for pair in words.windows(2) {
        let number = pair[0].trim_end_matches('+');
        if let Ok(years) = number.parse::<u32>() {
            if pair[1].starts_with("year") {
                return years.min(30);
            }
        }
    }

    let mut years: Vec<u32> = lower
        .split(|c: char| !c.is_ascii_digit())
        .filter(|t| t.len() == 4 && (t.starts_with("19") || t.starts_with("20")))
        .filter_map(|t| t.parse().ok())
        .collect();
    years.sort_unstable();
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        let span = last - first;
        if years.len() >= 2 && span > 0 && span <= 40 {
            return span.min(30);
        }
    }

    1
}

fn has_email(text: &str) -> bool {
    text.split_whitespace().any(|w| {
        let Some((local, domain)) = w.split_once('@') else {
            return false;
        };
        !local.is_empty() && domain.contains('.') && !domain.ends_with('.')
    })
}

pub fn resume_suggestions(text: &str, skills: &[String]) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut suggestions = Vec::new();

    if text.chars().count() < 500 {
        suggestions.push("Add more details to your resume - it appears too brief");
    }
    if skills.len() < 5 {
        suggestions.push("Include more technical and soft skills relevant to your field");
    }
    if !lower.contains("project") {
        suggestions.push("Add specific projects with measurable outcomes");
    }
    if !ACTION_WORDS[..6].iter().any(|w| lower.contains(w)) {
        suggestions.push("Use action verbs and quantify your achievements");
    }
    if !lower.contains("summary") && !lower.contains("objective") {
        suggestions.push("Add a professional summary section at the top");
    }
    if !lower.contains("education") {
        suggestions.push("Include your educational background");
    }
    if !has_email(text) {
        suggestions.push("Make sure your contact information is clearly visible");
    }
    if !lower.contains("linkedin") && !lower.contains("github") {
        suggestions.push("Add links to your LinkedIn profile or portfolio");
    }
    if suggestions.is_empty() {
        suggestions.push("Your resume looks comprehensive - keep it updated regularly");
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions.into_iter().map(str::to_string).collect()
}

/// Overall resume score, in [30, 98]
pub fn resume_score(text: &str, skills: &[String], experience_years: u32) -> u32 {
    let mut score = 50;
    score += (skills.len() as u32 * 3).min(20);
    score += (experience_years * 2).min(15);

    let len = text.chars().count();
    if len > 1000 {
        score += 5;
    }
    if len > 2000 {
        score += 5;
    }

    let lower = text.to_lowercase();
    score += ACTION_WORDS.iter().filter(|w| lower.contains(*w)).count() as u32;

    score.clamp(30, 98)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuse_scores() {
        // 0.5*80 + 0.3*90 + 0.2*70 = 81, +10 confident
        assert_eq!(fuse_scores(80, 90, EmotionLabel::Confident, 70.0), 91);
        assert_eq!(fuse_scores(80, 90, EmotionLabel::Nervous, 70.0), 76);
        assert_eq!(fuse_scores(0, 0, EmotionLabel::Nervous, 0.0), 30);
        assert_eq!(fuse_scores(100, 100, EmotionLabel::Confident, 100.0), 98);
    }

    #[test]
    fn test_feedback_bands() {
        assert!(feedback(90, EmotionLabel::Neutral).starts_with("Excellent"));
        assert!(feedback(70, EmotionLabel::Happy).starts_with("Good"));
        assert!(feedback(55, EmotionLabel::Neutral).starts_with("Decent"));
        assert!(feedback(40, EmotionLabel::Nervous).ends_with("take your time."));
        assert!(feedback(86, EmotionLabel::Confident).ends_with("really shows!"));
    }

    #[test]
    fn test_semantic_score_rewards_overlap() {
        let question = "What are your greatest strengths?";
        let weak = semantic_score("I like turtles a lot", question);
        let strong = semantic_score(
            "My greatest strengths are persistence and clarity, because I finish what I start",
            question,
        );
        assert!(strong > weak);
        assert_eq!(semantic_score("short", question), 30);
    }

    #[test]
    fn test_detect_skills() {
        let skills = detect_skills("Built services in Rust and Python on AWS with Docker");
        assert!(skills.contains(&"Rust".to_string()));
        assert!(skills.contains(&"Python".to_string()));
        assert!(skills.contains(&"AWS".to_string()));
        assert!(skills.contains(&"Docker".to_string()));
        assert_eq!(title_case("node.js"), "Node.Js");
    }

    #[test]
    fn test_detect_experience_years() {
        assert_eq!(detect_experience_years("I have 7+ years of experience"), 7);
        assert_eq!(detect_experience_years("Acme 2012 - 2020"), 8);
        assert_eq!(detect_experience_years("45 years in the field"), 30);
        assert_eq!(detect_experience_years("fresh graduate"), 1);
    }

    #[test]
    fn test_resume_suggestions_for_brief_resume() {
        let suggestions = resume_suggestions("Rust developer", &[]);
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions[0].contains("too brief"));
    }

    #[test]
    fn test_resume_score_bounds() {
        let skills: Vec<String> = (0..10).map(|i| format!("skill{}", i)).collect();
        assert!(resume_score("x", &[], 0) >= 30);
        assert!(resume_score(&"led managed ".repeat(300), &skills, 20) <= 98);
    }
}
