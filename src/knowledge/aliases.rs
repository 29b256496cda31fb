/// Alias phrases per registry key, checked in this order after full-name matching.
pub const DATASET_ALIASES: &[(&str, &[&str])] = &[
    (
        "Active_Directory_Computers",
        &["ad computers", "active directory computers", "computers"],
    ),
    (
        "Active_Directory_Groups",
        &["ad groups", "active directory groups", "groups"],
    ),
    ("Bloomberg_User_ReportTable", &["bloomberg", "bloomberg users"]),
    (
        "Computer_Hardware",
        &["hardware", "computer hardware", "devices hardware"],
    ),
    ("Finance_Budget", &["finance budget", "budget", "budgets"]),
    ("HR_Devices", &["hr devices", "devices", "mobile devices"]),
    ("HR_Employees", &["hr employees", "employees", "staff"]),
    ("IT_Software", &["it software", "software", "licenses"]),
    (
        "OCC_Unified_Patching_Report",
        &["patching", "patch report", "occ patching"],
    ),
    ("RightFax_Users", &["rightfax", "fax users", "rightfax users"]),
    (
        "User_Entitlements",
        &[
            "entitlements",
            "wave",
            "onedrive",
            "exchange",
            "user entitlements",
        ],
    ),
];
