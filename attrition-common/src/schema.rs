//! Fixed employee dataset schema
//!
//! Every uploaded table must carry these columns (exact names). Extra
//! columns are kept and passed through to the preprocessor untouched.

/// Numeric columns required in every upload
pub const NUMERIC_COLUMNS: [&str; 10] = [
    "Age",
    "DistanceFromHome",
    "MonthlyIncome",
    "NumCompaniesWorked",
    "PercentSalaryHike",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
];

/// Categorical columns required in every upload
pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    "BusinessTravel",
    "Department",
    "EducationField",
    "Gender",
    "JobRole",
    "MaritalStatus",
    "OverTime",
];

/// Target label column, excluded from model features when present
pub const TARGET_COLUMN: &str = "Attrition";

/// Optional employee identifier column
pub const EMPLOYEE_ID_COLUMN: &str = "EmployeeNumber";

/// All required columns, numeric first then categorical
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    NUMERIC_COLUMNS.iter().chain(CATEGORICAL_COLUMNS.iter()).copied()
}

/// Required columns absent from `present`, in schema order
pub fn missing_required<S: AsRef<str>>(present: &[S]) -> Vec<String> {
    required_columns()
        .filter(|required| !present.iter().any(|c| c.as_ref() == *required))
        .map(str::to_string)
        .collect()
}
