//! The static route table.
//!
//! Each entry ties an HTTP path to a prompt template and says where every
//! placeholder's value comes from: a field of the JSON request body or a
//! fixed string. Templates use minijinja `{{ name }}` placeholders.

/// HTTP method a route answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
}

/// Where a placeholder's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A required field of the request body.
    Body(&'static str),
    /// A hardcoded value.
    Fixed(&'static str),
}

/// A placeholder name and its value source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub placeholder: &'static str,
    pub source: Source,
}

impl Binding {
    pub const fn body(placeholder: &'static str, field: &'static str) -> Self {
        Self {
            placeholder,
            source: Source::Body(field),
        }
    }

    pub const fn fixed(placeholder: &'static str, value: &'static str) -> Self {
        Self {
            placeholder,
            source: Source::Fixed(value),
        }
    }
}

/// One prompt-forwarding route.
#[derive(Debug)]
pub struct PromptRoute {
    pub path: &'static str,
    pub method: RouteMethod,
    pub template: &'static str,
    pub bindings: &'static [Binding],
    /// Log the raw completion text before returning it.
    pub log_response: bool,
}

impl PromptRoute {
    /// Body fields the route requires, in binding order.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.iter().filter_map(|b| match b.source {
            Source::Body(field) => Some(field),
            Source::Fixed(_) => None,
        })
    }

    /// Whether the route reads anything from the request body.
    pub fn reads_body(&self) -> bool {
        self.required_fields().next().is_some()
    }
}

pub const DEADLINE_TEMPLATE: &str = "When is the {{ cycle }} deadline for {{ college_name }}";

pub const GENERAL_INFO_TEMPLATE: &str =
    "Get the admissions URL, application URL, and financial aid URL in this html text: {{ input }}";

pub const APPLICATION_STATISTICS_TEMPLATE: &str = "Get the total number of applicants, total number of male applicants, total number of female applicants, total percent overall admitted, total percent of males admitted, total percent of females admitted, median SAT Evidence-Based Reading and Writing score, median SAT Math score, median ACT composite score in json with snake case names from this html text: {{ input }}. No code. Just get the values. No text either. Just give me a JSON object. The json tags should be 'total_applicants', 'total_male_applicants', 'total_female_applicants', 'total_percent_admitted', 'total_percent_males_admitted', 'total_percent_females_admitted', 'sat_avg_english', 'sat_avg_math', 'act_avg'. Provide each field as a string.";

pub const APPLICATION_REQUIREMENTS_TEMPLATE: &str =
    "List {{ name }}'s application requirements as a Json Array of just each requirement string, no objects.";

pub const HOW_REVIEWED_TEMPLATE: &str = "How does {{ name }} review applications?";

pub const QUESTION_TEMPLATE: &str = "{{ question }}";

/// Every route the service exposes.
pub static ROUTES: &[PromptRoute] = &[
    PromptRoute {
        path: "/",
        method: RouteMethod::Get,
        template: DEADLINE_TEMPLATE,
        bindings: &[
            Binding::fixed("cycle", "early"),
            Binding::fixed("college_name", "Columbia University"),
        ],
        log_response: false,
    },
    PromptRoute {
        path: "/get-general-info",
        method: RouteMethod::Post,
        template: GENERAL_INFO_TEMPLATE,
        bindings: &[Binding::body("input", "html_input")],
        log_response: false,
    },
    PromptRoute {
        path: "/get-application-statistics",
        method: RouteMethod::Post,
        template: APPLICATION_STATISTICS_TEMPLATE,
        bindings: &[Binding::body("input", "input")],
        log_response: true,
    },
    PromptRoute {
        path: "/get-application-requirements",
        method: RouteMethod::Post,
        template: APPLICATION_REQUIREMENTS_TEMPLATE,
        bindings: &[Binding::body("name", "name")],
        log_response: true,
    },
    PromptRoute {
        path: "/get-how-reviewed",
        method: RouteMethod::Post,
        template: HOW_REVIEWED_TEMPLATE,
        bindings: &[Binding::body("name", "name")],
        log_response: true,
    },
    PromptRoute {
        path: "/ask-question",
        method: RouteMethod::Post,
        template: QUESTION_TEMPLATE,
        bindings: &[Binding::body("question", "question")],
        log_response: true,
    },
];

/// Look up a route by path.
pub fn find(path: &str) -> Option<&'static PromptRoute> {
    ROUTES.iter().find(|r| r.path == path)
}
