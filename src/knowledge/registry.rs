use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),
    #[error("unknown source kind: {0} (expected catalog, apis or reports)")]
    UnknownSource(String),
}

/// Static metadata for one accessible dataset fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetDescriptor {
    pub key: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub key_fields: &'static [&'static str],
    pub insights: &'static [&'static str],
}

impl DatasetDescriptor {
    const fn new(
        key: &'static str,
        path: &'static str,
        description: &'static str,
        key_fields: &'static [&'static str],
        insights: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            path,
            description,
            key_fields,
            insights,
        }
    }

    pub fn label(&self) -> String {
        super::human_label(self.key)
    }

    /// Case-insensitive lookup of a declared key field, returning its canonical spelling.
    pub fn key_field(&self, candidate: &str) -> Option<&'static str> {
        let candidate = candidate.trim();
        self.key_fields
            .iter()
            .copied()
            .find(|field| field.eq_ignore_ascii_case(candidate))
    }

    pub fn default_group_field(&self) -> Option<&'static str> {
        self.key_fields.first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Catalog,
    Apis,
    Reports,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Catalog => "catalog",
            SourceKind::Apis => "apis",
            SourceKind::Reports => "reports",
        };

        write!(f, "{}", label)
    }
}

impl FromStr for SourceKind {
    type Err = KnowledgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "catalog" | "datasets" => Ok(SourceKind::Catalog),
            "apis" | "api" => Ok(SourceKind::Apis),
            "reports" | "report" => Ok(SourceKind::Reports),
            other => Err(KnowledgeError::UnknownSource(other.to_string())),
        }
    }
}

/// Request-only sources: metadata is visible, records are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestrictedSource {
    pub kind: SourceKind,
    pub path: &'static str,
    pub description: &'static str,
}

/// Process-wide constant registry of datasets and restricted sources.
pub struct KnowledgeMap;

impl KnowledgeMap {
    /// Registry entries in alphabetical key order; resolution walks this order.
    pub fn datasets() -> &'static [DatasetDescriptor] {
        ACCESSIBLE
    }

    pub fn get(key: &str) -> Result<&'static DatasetDescriptor, KnowledgeError> {
        ACCESSIBLE
            .iter()
            .find(|descriptor| descriptor.key == key)
            .ok_or_else(|| KnowledgeError::UnknownDataset(key.to_string()))
    }

    pub fn restricted(kind: SourceKind) -> &'static RestrictedSource {
        match kind {
            SourceKind::Catalog => &RESTRICTED[0],
            SourceKind::Apis => &RESTRICTED[1],
            SourceKind::Reports => &RESTRICTED[2],
        }
    }

    pub fn catalog_path() -> &'static str {
        Self::restricted(SourceKind::Catalog).path
    }

    /// Human-formatted dataset names, alphabetically sorted.
    pub fn sorted_labels() -> Vec<String> {
        let mut labels: Vec<String> = ACCESSIBLE.iter().map(DatasetDescriptor::label).collect();
        labels.sort();
        labels
    }
}

const RESTRICTED: &[RestrictedSource] = &[
    RestrictedSource {
        kind: SourceKind::Catalog,
        path: "/mock/mockDatasets.json",
        description: "Datasets available in the global catalog for request and access approval.",
    },
    RestrictedSource {
        kind: SourceKind::Apis,
        path: "/mock/mockApis.json",
        description:
            "API endpoints for Bloomberg, HR, and M365 with available Swagger documentation.",
    },
    RestrictedSource {
        kind: SourceKind::Reports,
        path: "/mock/mockReports.json",
        description: "Mock Power BI and internal reporting data accessible upon approval.",
    },
];

const ACCESSIBLE: &[DatasetDescriptor] = &[
    DatasetDescriptor::new(
        "Active_Directory_Computers",
        "/mock/data/Active_Directory_Computers.json",
        "Inventory of computers and servers managed in Active Directory, including OS type and status.",
        &["Computer_Name", "Operating_System", "Last_Logon_Date", "Enabled"],
        &[
            "Identify inactive or disabled computers.",
            "Summarize operating system distribution across the network.",
            "Track password set and logon activity dates.",
        ],
    ),
    DatasetDescriptor::new(
        "Active_Directory_Groups",
        "/mock/data/Active_Directory_Groups.json",
        "Contains all Active Directory groups, including category, scope, and organizational unit.",
        &["group_name", "group_category", "group_scope", "organizational_unit"],
        &[
            "Summarize groups by type (Security vs Distribution).",
            "Track group creation and modification activity.",
            "Identify OU-level group structures.",
        ],
    ),
    DatasetDescriptor::new(
        "Bloomberg_User_ReportTable",
        "/mock/data/Bloomberg_User_ReportTable.json",
        "List of Bloomberg users, regions, and active status indicators.",
        &["Name", "Region", "Active"],
        &[
            "Count active Bloomberg users by region.",
            "Identify inactive or deactivated Bloomberg users.",
        ],
    ),
    DatasetDescriptor::new(
        "Computer_Hardware",
        "/mock/data/Computer_Hardware.json",
        "Hardware asset inventory including manufacturer, processor, and memory capacity.",
        &["Hostname", "Device_Manufacturer", "Processor", "Memory_GB"],
        &[
            "Summarize hardware distribution by manufacturer.",
            "Identify high-memory devices or outdated hardware.",
        ],
    ),
    DatasetDescriptor::new(
        "Finance_Budget",
        "/mock/data/Finance_Budget.json",
        "Department-level financial budgets and spending data for internal tracking.",
        &["department", "budget", "spent"],
        &[
            "Compare spending vs. budget allocation per department.",
            "Highlight departments exceeding 80% budget utilization.",
        ],
    ),
    DatasetDescriptor::new(
        "HR_Devices",
        "/mock/data/HR_Devices.json",
        "Device assignment list for employees across departments and office locations.",
        &["name", "department", "device", "location"],
        &[
            "Summarize devices by department or type.",
            "Identify location-based device distributions.",
        ],
    ),
    DatasetDescriptor::new(
        "HR_Employees",
        "/mock/data/HR_Employees.json",
        "Human Resources dataset listing employees, job titles, and unique identifiers.",
        &["EmpId", "FirstName", "LastName", "Title"],
        &[
            "List employees by title or role.",
            "Track employee count by department when correlated.",
        ],
    ),
    DatasetDescriptor::new(
        "IT_Software",
        "/mock/data/IT_Software.json",
        "IT software inventory by department and license count.",
        &["department", "software", "licenses"],
        &[
            "Summarize software usage across departments.",
            "Identify most widely licensed software applications.",
        ],
    ),
    DatasetDescriptor::new(
        "OCC_Unified_Patching_Report",
        "/mock/data/OCC_Unified_Patching_Report.json",
        "Patch management and compliance dataset tracking software updates across devices.",
        &["Core_Business_Line", "Patch_Name", "Rating", "Operating_System"],
        &[
            "Summarize patches by rating (Critical, Important, etc.).",
            "Identify overdue or unpatched systems.",
        ],
    ),
    DatasetDescriptor::new(
        "RightFax_Users",
        "/mock/data/RightFax_Users.json",
        "Fax and document service user list by department and status.",
        &["Login", "Dept", "Enabled"],
        &[
            "Count enabled vs disabled fax users.",
            "Show department-level usage of RightFax services.",
        ],
    ),
    DatasetDescriptor::new(
        "User_Entitlements",
        "/mock/data/User_Entitlements.json",
        "Comprehensive user entitlement dataset tracking cloud access, WAVE status, and adoption metrics.",
        &[
            "Employee_ID",
            "AD_status",
            "OneDrive_Status",
            "Exchange_Online_Status",
            "Teams_Enabled",
            "Modern_Score",
        ],
        &[
            "Summarize adoption metrics for OneDrive and Teams.",
            "Identify users with restricted or inactive entitlements.",
            "Calculate average Modern Score across the organization.",
        ],
    ),
];
