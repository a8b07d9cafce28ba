//! Skills shipped with the application. Never mutated or removed at runtime.

use crate::skills::Skill;

const BUILTIN: [(&str, &str); 20] = [
    ("javascript", "JavaScript"),
    ("python", "Python"),
    ("java", "Java"),
    ("react", "React"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("sql", "SQL"),
    ("git", "Git"),
    ("nodejs", "Node.js"),
    ("typescript", "TypeScript"),
    ("docker", "Docker"),
    ("cloud-basics", "Cloud Computing (AWS/Azure/GCP)"),
    ("agile", "Agile Methoden"),
    ("angular", "Angular"),
    ("c-sharp", "C#"),
    ("machine-learning", "Machine Learning"),
    ("mysql", "MySQL/PostgreSQL"),
    ("linux", "Linux/Unix"),
    ("ci-cd", "CI/CD"),
    ("projektmanagement", "Projektmanagement"),
];

pub const BUILTIN_COUNT: usize = BUILTIN.len();

/// Built-in skills in their fixed display order
pub fn builtin_skills() -> Vec<Skill> {
    BUILTIN
        .iter()
        .map(|(value, label)| Skill::new(*value, *label))
        .collect()
}

pub fn is_builtin(value: &str) -> bool {
    BUILTIN.iter().any(|(builtin, _)| *builtin == value)
}
