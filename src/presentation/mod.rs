pub mod cli;
pub mod http;

/// Shown as buttons in the web UI and served by `/api/examples`.
pub const EXAMPLE_QUESTIONS: [&str; 8] = [
    "What is a PCBU's primary duty of care?",
    "What are the penalties for serious violations?",
    "Who can be held responsible for workplace safety?",
    "What is the definition of a worker?",
    "What are the requirements for health and safety representatives?",
    "What are the duties of an officer under the Act?",
    "When must a workplace incident be notified?",
    "What consultation requirements exist for PCBUs?",
];

/// Asked by `ask` when no question is given.
pub const SAMPLE_QUESTIONS: [&str; 5] = [
    "What is a PCBU's primary duty of care?",
    "What are the penalties for serious health and safety violations?",
    "Who can be held responsible for workplace safety?",
    "What is the definition of a worker under this Act?",
    "What are the requirements for health and safety representatives?",
];

/// Run by `inspect` when no query is given.
pub const INSPECTION_QUERIES: [&str; 3] = [
    "What is a PCBU's primary duty of care?",
    "What are the penalties for health and safety violations?",
    "Who is responsible for workplace safety?",
];
