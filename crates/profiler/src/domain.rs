//! Domain classification from header names.
//!
//! Keyword lists are tried in a fixed priority order and the first list
//! with a keyword contained in any lower-cased column name wins. The
//! order is observable: a header such as "price per dish" matches both
//! `restaurant` and `financial`, and `restaurant` wins.

use crate::{ColumnType, DataColumn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain tag assigned to a profiled grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainTag {
    Restaurant,
    Healthcare,
    Financial,
    Sports,
    Education,
    Hr,
    Ecommerce,
    RealEstate,
    Manufacturing,
    Government,
    Media,
    Logistics,
    Survey,
    Analytics,
    Banking,
    General,
    Other,
}

/// Keyword lists in priority order. `Other` has none; it is the fallback.
const DOMAIN_KEYWORDS: &[(DomainTag, &[&str])] = &[
    (
        DomainTag::Restaurant,
        &["menu", "dish", "cuisine", "restaurant", "waiter", "reservation", "chef", "order item"],
    ),
    (
        DomainTag::Healthcare,
        &["patient", "diagnosis", "doctor", "hospital", "treatment", "medication", "symptom", "clinic"],
    ),
    (
        DomainTag::Financial,
        &["price", "cost", "amount", "revenue", "profit", "budget", "expense", "income", "invoice", "salary"],
    ),
    (
        DomainTag::Sports,
        &["player", "team", "match", "goals", "league", "season", "tournament", "coach", "athlete"],
    ),
    (
        DomainTag::Education,
        &["student", "grade", "course", "teacher", "school", "exam", "enrollment", "gpa"],
    ),
    (
        DomainTag::Hr,
        &["employee", "department", "hire date", "position", "manager", "payroll", "job title", "staff"],
    ),
    (
        DomainTag::Ecommerce,
        &["product", "sku", "order", "customer", "cart", "checkout", "discount", "shipping"],
    ),
    (
        DomainTag::RealEstate,
        &["property", "bedroom", "bathroom", "sqft", "square feet", "listing", "lease"],
    ),
    (
        DomainTag::Manufacturing,
        &["machine", "production", "defect", "batch", "assembly", "factory", "downtime"],
    ),
    (
        DomainTag::Government,
        &["citizen", "permit", "district", "agency", "census", "population", "municipality"],
    ),
    (
        DomainTag::Media,
        &["episode", "channel", "subscriber", "likes", "genre", "article", "publisher"],
    ),
    (
        DomainTag::Logistics,
        &["shipment", "warehouse", "carrier", "tracking", "delivery", "freight", "inventory", "stock"],
    ),
    (
        DomainTag::Survey,
        &["rating", "score", "satisfaction", "response", "survey", "feedback", "respondent"],
    ),
    (
        DomainTag::Analytics,
        &["views", "clicks", "conversion", "traffic", "users", "sessions", "impressions"],
    ),
    (
        DomainTag::Banking,
        &["account", "balance", "transaction", "deposit", "withdrawal", "loan", "interest"],
    ),
    (
        DomainTag::General,
        &["name", "id", "date", "description", "notes", "status", "type", "category"],
    ),
];

impl DomainTag {
    /// Every tag in priority order, `Other` last.
    pub const ALL: [DomainTag; 17] = [
        DomainTag::Restaurant,
        DomainTag::Healthcare,
        DomainTag::Financial,
        DomainTag::Sports,
        DomainTag::Education,
        DomainTag::Hr,
        DomainTag::Ecommerce,
        DomainTag::RealEstate,
        DomainTag::Manufacturing,
        DomainTag::Government,
        DomainTag::Media,
        DomainTag::Logistics,
        DomainTag::Survey,
        DomainTag::Analytics,
        DomainTag::Banking,
        DomainTag::General,
        DomainTag::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DomainTag::Restaurant => "restaurant",
            DomainTag::Healthcare => "healthcare",
            DomainTag::Financial => "financial",
            DomainTag::Sports => "sports",
            DomainTag::Education => "education",
            DomainTag::Hr => "hr",
            DomainTag::Ecommerce => "ecommerce",
            DomainTag::RealEstate => "realestate",
            DomainTag::Manufacturing => "manufacturing",
            DomainTag::Government => "government",
            DomainTag::Media => "media",
            DomainTag::Logistics => "logistics",
            DomainTag::Survey => "survey",
            DomainTag::Analytics => "analytics",
            DomainTag::Banking => "banking",
            DomainTag::General => "general",
            DomainTag::Other => "other",
        }
    }

    /// Keywords tested for this tag.
    pub fn keywords(self) -> &'static [&'static str] {
        DOMAIN_KEYWORDS
            .iter()
            .find(|(tag, _)| *tag == self)
            .map_or(&[] as &[&str], |(_, words)| *words)
    }

    /// Canned texts used by suggestions for this domain.
    pub fn playbook(self) -> &'static Playbook {
        playbook(self)
    }
}

impl Default for DomainTag {
    fn default() -> Self {
        DomainTag::Other
    }
}

impl fmt::Display for DomainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify columns by their header names.
///
/// `Analytics` additionally requires at least one number column.
pub fn classify(columns: &[DataColumn]) -> DomainTag {
    let names: Vec<String> = columns.iter().map(|c| c.name.to_lowercase()).collect();
    let has_numbers = columns.iter().any(|c| c.column_type == ColumnType::Number);

    for (tag, keywords) in DOMAIN_KEYWORDS {
        if *tag == DomainTag::Analytics && !has_numbers {
            continue;
        }
        if names
            .iter()
            .any(|name| keywords.iter().any(|keyword| name.contains(keyword)))
        {
            return *tag;
        }
    }

    DomainTag::Other
}

/// Chart hint attached to a domain.
#[derive(Debug, Clone, Copy)]
pub struct DomainChart {
    pub kind: &'static str,
    pub reason: &'static str,
}

/// Per-domain canned texts.
#[derive(Debug)]
pub struct Playbook {
    /// Sentence prefixed to remote prompts.
    pub context: &'static str,
    pub questions: &'static [&'static str],
    pub transformations: &'static [&'static str],
    pub operations: &'static [&'static str],
    pub prompts: &'static [&'static str],
    pub chart: Option<DomainChart>,
}

static RESTAURANT: Playbook = Playbook {
    context: "This is restaurant data. Focus on menu performance, orders, and service metrics.",
    questions: &[
        "Which dishes sell the most?",
        "What is the average order value?",
        "Which menu categories are most profitable?",
    ],
    transformations: &[
        "Group orders by menu category",
        "Calculate revenue per dish",
    ],
    operations: &[
        "Rank dishes by popularity",
        "Summarize orders by category",
        "Highlight low-performing menu items",
    ],
    prompts: &[
        "analyze best-selling dishes",
        "calculate average order value",
        "identify peak reservation times",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Compares sales across menu items",
    }),
};

static HEALTHCARE: Playbook = Playbook {
    context: "This is healthcare data. Focus on patient outcomes, treatments, and visit metrics.",
    questions: &[
        "What are the most common diagnoses?",
        "How are patients distributed across doctors?",
        "Which treatments are used most often?",
    ],
    transformations: &[
        "Group patients by diagnosis",
        "Count visits per doctor",
    ],
    operations: &[
        "Summarize patients by diagnosis",
        "Count treatments by type",
        "Flag incomplete patient records",
    ],
    prompts: &[
        "analyze diagnosis frequency",
        "summarize patient visits by doctor",
        "identify common treatments",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Shows case counts by diagnosis",
    }),
};

static FINANCIAL: Playbook = Playbook {
    context: "This is financial data. Focus on monetary analysis, trends, and calculations.",
    questions: &[
        "What are the top revenue generators?",
        "How do costs compare across categories?",
        "What are the profit margin trends?",
    ],
    transformations: &[
        "Calculate profit margins and growth rates",
        "Create budget variance analysis",
    ],
    operations: &[
        "Calculate totals and percentages",
        "Create budget vs actual analysis",
        "Generate financial trend charts",
    ],
    prompts: &[
        "analyze financial performance and trends",
        "calculate profit margins and growth rates",
        "identify top performing categories",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Ideal for financial comparisons and budgets",
    }),
};

static SPORTS: Playbook = Playbook {
    context: "This is sports data. Focus on player and team performance statistics.",
    questions: &[
        "Which players have the best performance?",
        "How do teams compare across the season?",
        "What are the scoring trends?",
    ],
    transformations: &[
        "Calculate per-game averages",
        "Rank players by key statistics",
    ],
    operations: &[
        "Rank players by performance",
        "Summarize results by team",
        "Highlight top scorers",
    ],
    prompts: &[
        "rank players by goals",
        "compare team performance",
        "identify the top performers this season",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Compares player and team statistics",
    }),
};

static EDUCATION: Playbook = Playbook {
    context: "This is education data. Focus on student performance and course outcomes.",
    questions: &[
        "What is the average grade per course?",
        "Which students need extra support?",
        "How do exam scores vary across classes?",
    ],
    transformations: &[
        "Convert scores into letter grades",
        "Calculate averages per course",
    ],
    operations: &[
        "Calculate average grades by course",
        "Highlight students below passing",
        "Rank students by performance",
    ],
    prompts: &[
        "calculate average grade by course",
        "identify students below passing",
        "compare exam results across classes",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Compares grades across courses",
    }),
};

static HR: Playbook = Playbook {
    context: "This is HR data. Focus on headcount, departments, and workforce metrics.",
    questions: &[
        "How many employees are in each department?",
        "What is the average tenure?",
        "How is headcount changing over time?",
    ],
    transformations: &[
        "Calculate tenure from hire dates",
        "Group employees by department",
    ],
    operations: &[
        "Count employees by department",
        "Summarize payroll by department",
        "Highlight recent hires",
    ],
    prompts: &[
        "count employees by department",
        "analyze headcount by position",
        "summarize payroll by department",
    ],
    chart: Some(DomainChart {
        kind: "pie",
        reason: "Shows headcount share by department",
    }),
};

static ECOMMERCE: Playbook = Playbook {
    context: "This is e-commerce data. Focus on products, orders, and customer behaviour.",
    questions: &[
        "Which products sell the most?",
        "Who are the most valuable customers?",
        "How do discounts affect orders?",
    ],
    transformations: &[
        "Calculate order totals per customer",
        "Group sales by product",
    ],
    operations: &[
        "Summarize sales by product",
        "Identify repeat customers",
        "Calculate average order size",
    ],
    prompts: &[
        "identify best-selling products",
        "analyze orders by customer",
        "calculate average order value",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Compares sales across products",
    }),
};

static REAL_ESTATE: Playbook = Playbook {
    context: "This is real estate data. Focus on property attributes, prices, and listings.",
    questions: &[
        "What is the average price per square foot?",
        "How do bedrooms affect listing price?",
        "Which properties are the best value?",
    ],
    transformations: &[
        "Calculate price per square foot",
        "Group listings by bedroom count",
    ],
    operations: &[
        "Compare listings by size",
        "Group properties by bedrooms",
        "Highlight the best-value properties",
    ],
    prompts: &[
        "calculate price per square foot",
        "group listings by bedrooms",
        "find the best-value properties",
    ],
    chart: Some(DomainChart {
        kind: "scatter",
        reason: "Relates property size to price",
    }),
};

static MANUFACTURING: Playbook = Playbook {
    context: "This is manufacturing data. Focus on output, defects, and machine efficiency.",
    questions: &[
        "Which machines have the most downtime?",
        "What is the defect rate per batch?",
        "How does production vary across shifts?",
    ],
    transformations: &[
        "Calculate defect rates per batch",
        "Summarize downtime by machine",
    ],
    operations: &[
        "Summarize production by machine",
        "Highlight batches with high defects",
        "Track downtime trends",
    ],
    prompts: &[
        "calculate defect rate by batch",
        "identify machines with the most downtime",
        "summarize production output",
    ],
    chart: Some(DomainChart {
        kind: "line",
        reason: "Tracks production output over time",
    }),
};

static GOVERNMENT: Playbook = Playbook {
    context: "This is public sector data. Focus on districts, programs, and population metrics.",
    questions: &[
        "How is population distributed across districts?",
        "Which permits are most common?",
        "How do agencies compare?",
    ],
    transformations: &[
        "Group records by district",
        "Calculate per-capita figures",
    ],
    operations: &[
        "Summarize records by district",
        "Count permits by type",
        "Compare agencies",
    ],
    prompts: &[
        "summarize population by district",
        "count permits by type",
        "compare agency figures",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Compares districts side by side",
    }),
};

static MEDIA: Playbook = Playbook {
    context: "This is media data. Focus on audience, engagement, and content performance.",
    questions: &[
        "Which content gets the most engagement?",
        "How is the subscriber count trending?",
        "Which genres perform best?",
    ],
    transformations: &[
        "Calculate engagement rates",
        "Group content by genre",
    ],
    operations: &[
        "Rank content by engagement",
        "Summarize performance by channel",
        "Highlight top episodes",
    ],
    prompts: &[
        "rank content by likes",
        "analyze performance by genre",
        "compare channels by subscribers",
    ],
    chart: Some(DomainChart {
        kind: "line",
        reason: "Shows audience growth over time",
    }),
};

static LOGISTICS: Playbook = Playbook {
    context: "This is logistics data. Focus on stock levels, shipments, and supply chain metrics.",
    questions: &[
        "Which items are running low on stock?",
        "Which carriers deliver on time?",
        "Which products need reordering?",
    ],
    transformations: &[
        "Calculate inventory turnover and reorder points",
        "Identify fast and slow-moving items",
    ],
    operations: &[
        "Calculate low stock alerts",
        "Generate inventory turnover analysis",
        "Create reorder point calculations",
    ],
    prompts: &[
        "analyze inventory levels and turnover",
        "identify low stock items",
        "compare carrier delivery times",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Compares stock levels across items",
    }),
};

static SURVEY: Playbook = Playbook {
    context: "This is survey data. Focus on response analysis, ratings, and statistical summaries.",
    questions: &[
        "What is the overall satisfaction score?",
        "Which responses show the highest ratings?",
        "Are there any concerning feedback patterns?",
    ],
    transformations: &[
        "Calculate satisfaction scores and Net Promoter Score",
        "Group responses into satisfaction categories",
    ],
    operations: &[
        "Calculate response distributions",
        "Create satisfaction score analysis",
        "Generate response rate statistics",
    ],
    prompts: &[
        "analyze survey responses and satisfaction scores",
        "identify response patterns and trends",
        "calculate average ratings by category",
    ],
    chart: Some(DomainChart {
        kind: "bar",
        reason: "Perfect for rating distributions and responses",
    }),
};

static ANALYTICS: Playbook = Playbook {
    context: "This is analytics data. Focus on performance metrics, trends, and KPI analysis.",
    questions: &[
        "What are the key performance trends?",
        "Which metrics show the best growth?",
        "Are there any performance bottlenecks?",
    ],
    transformations: &[
        "Calculate conversion rates and performance ratios",
        "Create performance benchmarks and targets",
    ],
    operations: &[
        "Calculate conversion rates",
        "Generate traffic trend analysis",
        "Create performance dashboards",
    ],
    prompts: &[
        "analyze website traffic and user behavior",
        "calculate conversion rates and performance metrics",
        "identify top performing channels",
    ],
    chart: Some(DomainChart {
        kind: "line",
        reason: "Best for tracking performance metrics over time",
    }),
};

static BANKING: Playbook = Playbook {
    context: "This is banking data. Focus on accounts, balances, and transaction activity.",
    questions: &[
        "Which accounts have the highest balances?",
        "How do deposits compare to withdrawals?",
        "Are there unusual transactions?",
    ],
    transformations: &[
        "Calculate running balances",
        "Group transactions by type",
    ],
    operations: &[
        "Summarize transactions by account",
        "Compare deposits and withdrawals",
        "Highlight large transactions",
    ],
    prompts: &[
        "summarize transactions by account",
        "compare deposits and withdrawals",
        "flag unusually large transactions",
    ],
    chart: Some(DomainChart {
        kind: "line",
        reason: "Tracks balances over time",
    }),
};

static GENERAL: Playbook = Playbook {
    context: "Analyze this general dataset appropriately.",
    questions: &[],
    transformations: &[],
    operations: &["Sort data by numeric columns", "Create pivot table analysis"],
    prompts: &[],
    chart: None,
};

fn playbook(tag: DomainTag) -> &'static Playbook {
    match tag {
        DomainTag::Restaurant => &RESTAURANT,
        DomainTag::Healthcare => &HEALTHCARE,
        DomainTag::Financial => &FINANCIAL,
        DomainTag::Sports => &SPORTS,
        DomainTag::Education => &EDUCATION,
        DomainTag::Hr => &HR,
        DomainTag::Ecommerce => &ECOMMERCE,
        DomainTag::RealEstate => &REAL_ESTATE,
        DomainTag::Manufacturing => &MANUFACTURING,
        DomainTag::Government => &GOVERNMENT,
        DomainTag::Media => &MEDIA,
        DomainTag::Logistics => &LOGISTICS,
        DomainTag::Survey => &SURVEY,
        DomainTag::Analytics => &ANALYTICS,
        DomainTag::Banking => &BANKING,
        DomainTag::General | DomainTag::Other => &GENERAL,
    }
}
