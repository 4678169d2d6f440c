//! Static content behind the public page sections. Each function returns the
//! literal list its section renders; nothing here is stateful.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Highlight {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CallToAction {
    pub headline: &'static str,
    pub body: &'static str,
    #[serde(rename = "actionLabel")]
    pub action_label: &'static str,
    #[serde(rename = "actionHref")]
    pub action_href: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoadingMessage {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Period {
    pub day: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub subject: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Section {
    Highlights(Vec<Highlight>),
    CallToAction(CallToAction),
    Loading(LoadingMessage),
    Timetable(Vec<Period>),
}

impl Section {
    /// Looks a section up by the slug used in its route.
    pub fn by_slug(slug: &str) -> Option<Section> {
        match slug {
            "academics" => Some(Section::Highlights(academics())),
            "admissions" => Some(Section::CallToAction(admissions_cta())),
            "student-life" => Some(Section::Highlights(student_life())),
            "loading" => Some(Section::Loading(loading())),
            "timetable" => Some(Section::Timetable(timetable())),
            _ => None,
        }
    }
}

pub fn academics() -> Vec<Highlight> {
    vec![
        Highlight {
            title: "Sciences",
            description: "Laboratory-based physics, chemistry and biology from the first year.",
        },
        Highlight {
            title: "Mathematics",
            description: "Core and advanced tracks with weekly problem-solving workshops.",
        },
        Highlight {
            title: "Languages",
            description: "Literature, composition and two foreign languages.",
        },
        Highlight {
            title: "Arts & Technology",
            description: "Music, visual arts and an introductory programming course.",
        },
    ]
}

pub fn admissions_cta() -> CallToAction {
    CallToAction {
        headline: "Admissions are open",
        body: "Visit the campus, meet our teachers and submit your application online.",
        action_label: "Apply now",
        action_href: "/admissions/apply",
    }
}

pub fn student_life() -> Vec<Highlight> {
    vec![
        Highlight {
            title: "Sports",
            description: "Football, basketball, volleyball and athletics teams.",
        },
        Highlight {
            title: "Clubs",
            description: "Robotics, debate, chess and environmental clubs.",
        },
        Highlight {
            title: "Events",
            description: "Science fair, cultural week and the annual sports day.",
        },
    ]
}

pub fn loading() -> LoadingMessage {
    LoadingMessage {
        message: "Loading...",
    }
}

pub fn timetable() -> Vec<Period> {
    const DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
    const SLOTS: [(&str, &str); 4] = [
        ("08:00", "09:30"),
        ("09:45", "11:15"),
        ("11:30", "13:00"),
        ("14:00", "15:30"),
    ];
    const SUBJECTS: [&str; 6] = [
        "Mathematics",
        "Sciences",
        "Languages",
        "History",
        "Arts & Technology",
        "Physical Education",
    ];

    let mut periods = Vec::with_capacity(DAYS.len() * SLOTS.len());
    for (d, day) in DAYS.iter().enumerate() {
        for (s, (start, end)) in SLOTS.iter().enumerate() {
            periods.push(Period {
                day: *day,
                start: *start,
                end: *end,
                subject: SUBJECTS[(d + s) % SUBJECTS.len()],
            });
        }
    }
    periods
}
