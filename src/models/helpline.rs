use serde::Serialize;

/// Static crisis helpline reference data. Never computed, only rendered.
#[derive(Debug, Clone, Serialize)]
pub struct Helpline {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
    pub country: &'static str,
}

pub const HELPLINES: [Helpline; 5] = [
    Helpline {
        name: "Suicide Prevention Helpline",
        number: "988",
        description: "24/7 Crisis Support",
        country: "India",
    },
    Helpline {
        name: "Mental Health Support",
        number: "1800-599-0019",
        description: "Free Mental Health Helpline",
        country: "India",
    },
    Helpline {
        name: "National Suicide Prevention Lifeline",
        number: "1-800-273-8255",
        description: "24/7 Crisis Support",
        country: "USA",
    },
    Helpline {
        name: "Samaritans",
        number: "116 123",
        description: "Free to call anytime",
        country: "UK",
    },
    Helpline {
        name: "Lifeline Australia",
        number: "13 11 14",
        description: "24 hour crisis support",
        country: "Australia",
    },
];
