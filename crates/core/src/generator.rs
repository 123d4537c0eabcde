//! Random synthetic patient records.
//!
//! Produces plausible demographic and clinical records for populating test
//! systems. Every random choice goes through a [`Picker`], so a
//! [`crate::SeededPicker`] yields the same batch for the same seed and date.

use crate::export::{ExportError, ExportFormat};
use crate::selector::Picker;
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest batch a single request may ask for.
pub const MAX_BATCH: usize = 100;

pub const FIRST_NAMES: [&str; 32] = [
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Christopher", "Karen", "Charles", "Nancy", "Daniel", "Lisa", "Matthew", "Helen", "Anthony",
    "Sandra", "Mark", "Donna", "Donald", "Carol",
];

pub const LAST_NAMES: [&str; 32] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young",
];

pub const CONDITIONS: [&str; 15] = [
    "Hypertension",
    "Type 2 Diabetes",
    "Asthma",
    "Arthritis",
    "Depression",
    "Anxiety",
    "Migraine",
    "COPD",
    "Heart Disease",
    "Allergies",
    "Osteoporosis",
    "Insomnia",
    "GERD",
    "Hypothyroidism",
    "Anemia",
];

pub const MEDICATIONS: [&str; 15] = [
    "Lisinopril",
    "Metformin",
    "Albuterol",
    "Ibuprofen",
    "Sertraline",
    "Omeprazole",
    "Levothyroxine",
    "Amlodipine",
    "Metoprolol",
    "Aspirin",
    "Atorvastatin",
    "Losartan",
    "Gabapentin",
    "Hydrochlorothiazide",
    "Prednisone",
];

pub const ALLERGIES: [&str; 4] = ["Penicillin", "Peanuts", "Shellfish", "Latex"];

pub const INSURERS: [&str; 6] = [
    "Blue Cross",
    "Aetna",
    "Cigna",
    "UnitedHealth",
    "Medicare",
    "Medicaid",
];

const STREETS: [&str; 7] = ["Main", "Oak", "First", "Second", "Park", "Elm", "Pine"];

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    #[error("Patient count must be between 1 and {MAX_BATCH}, got {0}")]
    InvalidCount(usize),

    #[error("Unknown age range '{0}', expected pediatric, adult, elderly or all")]
    UnknownAgeRange(String),

    #[error("No patients to export")]
    NothingToExport,
}

/// Age band patients are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeRange {
    /// 0 to 17.
    Pediatric,
    /// 18 to 64.
    Adult,
    /// 65 to 95.
    Elderly,
    /// 1 to 95.
    #[default]
    All,
}

impl AgeRange {
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            Self::Pediatric => (0, 17),
            Self::Adult => (18, 64),
            Self::Elderly => (65, 95),
            Self::All => (1, 95),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pediatric => "pediatric",
            Self::Adult => "adult",
            Self::Elderly => "elderly",
            Self::All => "all",
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeRange {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pediatric" => Ok(Self::Pediatric),
            "adult" => Ok(Self::Adult),
            "elderly" => Ok(Self::Elderly),
            "all" => Ok(Self::All),
            other => Err(GeneratorError::UnknownAgeRange(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientHistory {
    pub conditions: Vec<String>,
    /// One medication per condition, in the same order.
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Beats per minute.
    pub heart_rate: i32,
    /// `systolic/diastolic` in mmHg.
    pub blood_pressure: String,
    /// Degrees Celsius, one decimal.
    pub temperature: f64,
    pub respiratory_rate: i32,
    pub oxygen_saturation: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insurance {
    pub provider: String,
    pub policy_number: String,
}

/// One generated patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticPatient {
    /// `PT-` followed by nine base-36 characters.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub contact_info: ContactInfo,
    pub medical_history: PatientHistory,
    pub vital_signs: VitalSigns,
    pub insurance: Insurance,
    pub last_visit: NaiveDate,
    pub created: DateTime<Utc>,
}

/// Builds [`SyntheticPatient`]s from an injected [`Picker`].
pub struct PatientGenerator {
    picker: Box<dyn Picker>,
}

impl PatientGenerator {
    pub fn new(picker: Box<dyn Picker>) -> Self {
        Self { picker }
    }

    /// Generates `count` patients, `1..=MAX_BATCH`.
    pub fn batch(
        &mut self,
        count: usize,
        range: AgeRange,
        now: DateTime<Utc>,
    ) -> Result<PatientBatch, GeneratorError> {
        if count == 0 || count > MAX_BATCH {
            return Err(GeneratorError::InvalidCount(count));
        }
        let patients = (0..count).map(|_| self.patient(range, now)).collect();
        Ok(PatientBatch {
            generated_at: now,
            patients,
        })
    }

    pub fn patient(&mut self, range: AgeRange, now: DateTime<Utc>) -> SyntheticPatient {
        let first_name = self.one_of(&FIRST_NAMES).to_string();
        let last_name = self.one_of(&LAST_NAMES).to_string();
        let (low, high) = range.bounds();
        let age = self.between(low as i32, high as i32) as u32;
        let gender = if self.between(0, 1) == 1 { "Male" } else { "Female" };

        let today = now.date_naive();
        let date_of_birth = today
            .checked_sub_months(Months::new(age * 12))
            .unwrap_or(NaiveDate::MIN);

        let contact_info = ContactInfo {
            phone: format!(
                "({}) {}-{}",
                self.between(200, 999),
                self.between(200, 999),
                self.between(1000, 9999)
            ),
            email: format!(
                "{}.{}@email.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            ),
            address: format!("{} {} St", self.between(100, 9999), self.one_of(&STREETS)),
        };

        let medical_history = self.history();
        let vital_signs = self.vital_signs(age);
        let insurance = Insurance {
            provider: self.one_of(&INSURERS).to_string(),
            policy_number: format!("POL-{}", self.base36(12)),
        };

        SyntheticPatient {
            id: format!("PT-{}", self.base36(9)),
            full_name: format!("{first_name} {last_name}"),
            first_name,
            last_name,
            age,
            gender: gender.to_string(),
            date_of_birth,
            contact_info,
            medical_history,
            vital_signs,
            insurance,
            last_visit: self.last_visit(),
            created: now,
        }
    }

    fn history(&mut self) -> PatientHistory {
        let mut conditions: Vec<String> = Vec::new();
        let mut medications = Vec::new();
        // A repeated draw is skipped, so a patient may end up with fewer.
        for _ in 0..self.between(0, 3) {
            let condition = self.one_of(&CONDITIONS);
            if !conditions.iter().any(|c| c == condition) {
                conditions.push(condition.to_string());
                medications.push(self.one_of(&MEDICATIONS).to_string());
            }
        }
        let allergies = if self.between(1, 10) > 7 {
            vec![self.one_of(&ALLERGIES).to_string()]
        } else {
            Vec::new()
        };
        PatientHistory {
            conditions,
            medications,
            allergies,
        }
    }

    /// Children get faster heart and breathing rates and lower pressures.
    fn vital_signs(&mut self, age: u32) -> VitalSigns {
        let child = age < 18;
        let (hr, sys, dia, rr) = if child {
            ((80, 120), (95, 115), (55, 75), (18, 30))
        } else {
            ((60, 100), (110, 140), (70, 90), (12, 20))
        };
        let heart_rate = self.between(hr.0, hr.1) + self.between(-10, 10);
        let systolic = self.between(sys.0, sys.1) + self.between(-15, 25);
        let diastolic = self.between(dia.0, dia.1) + self.between(-10, 15);
        VitalSigns {
            heart_rate,
            blood_pressure: format!("{systolic}/{diastolic}"),
            temperature: f64::from(self.between(361, 375)) / 10.0,
            respiratory_rate: self.between(rr.0, rr.1),
            oxygen_saturation: self.between(95, 100),
        }
    }

    /// A day in 2023 or 2024.
    fn last_visit(&mut self) -> NaiveDate {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN);
        let offset = self.between(0, 730);
        start
            .checked_add_days(chrono::Days::new(offset as u64))
            .unwrap_or(start)
    }

    /// Uniform integer in `min..=max`.
    fn between(&mut self, min: i32, max: i32) -> i32 {
        let len = (max - min + 1) as usize;
        min + self.picker.pick(len).min(len - 1) as i32
    }

    fn one_of<'a>(&mut self, pool: &[&'a str]) -> &'a str {
        let index = self.picker.pick(pool.len()).min(pool.len() - 1);
        pool[index]
    }

    fn base36(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| BASE36[self.between(0, 35) as usize] as char)
            .collect()
    }
}

impl fmt::Debug for PatientGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatientGenerator").finish_non_exhaustive()
    }
}

/// A generated set of patients, exportable as a JSON array or a CSV sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientBatch {
    pub generated_at: DateTime<Utc>,
    pub patients: Vec<SyntheticPatient>,
}

#[derive(Serialize)]
struct PatientRow<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "First Name")]
    first_name: &'a str,
    #[serde(rename = "Last Name")]
    last_name: &'a str,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Gender")]
    gender: &'a str,
    #[serde(rename = "Date of Birth")]
    date_of_birth: NaiveDate,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Conditions")]
    conditions: String,
    #[serde(rename = "Medications")]
    medications: String,
    #[serde(rename = "Allergies")]
    allergies: String,
    #[serde(rename = "Heart Rate")]
    heart_rate: i32,
    #[serde(rename = "Blood Pressure")]
    blood_pressure: &'a str,
    #[serde(rename = "Temperature")]
    temperature: String,
    #[serde(rename = "Insurance Provider")]
    insurance_provider: &'a str,
    #[serde(rename = "Last Visit")]
    last_visit: NaiveDate,
}

impl<'a> From<&'a SyntheticPatient> for PatientRow<'a> {
    fn from(p: &'a SyntheticPatient) -> Self {
        let history = &p.medical_history;
        Self {
            id: &p.id,
            first_name: &p.first_name,
            last_name: &p.last_name,
            age: p.age,
            gender: &p.gender,
            date_of_birth: p.date_of_birth,
            phone: &p.contact_info.phone,
            email: &p.contact_info.email,
            address: &p.contact_info.address,
            conditions: history.conditions.join("; "),
            medications: history.medications.join("; "),
            allergies: history.allergies.join("; "),
            heart_rate: p.vital_signs.heart_rate,
            blood_pressure: &p.vital_signs.blood_pressure,
            temperature: format!("{:.1}", p.vital_signs.temperature),
            insurance_provider: &p.insurance.provider,
            last_visit: p.last_visit,
        }
    }
}

impl PatientBatch {
    pub fn from_patients(patients: Vec<SyntheticPatient>, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            patients,
        }
    }

    /// The patients as a pretty-printed JSON array.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.patients)?)
    }

    /// One row per patient. List fields are joined with `"; "`.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(Vec::new());
        for patient in &self.patients {
            writer.serialize(PatientRow::from(patient))?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Renders the batch, refusing to export an empty one.
    pub fn render(&self, format: ExportFormat) -> Result<String, BatchExportError> {
        if self.patients.is_empty() {
            return Err(GeneratorError::NothingToExport.into());
        }
        Ok(match format {
            ExportFormat::Json => self.to_json_pretty()?,
            ExportFormat::Csv => self.to_csv()?,
        })
    }

    /// `synthetic_patients_<YYYY-MM-DD>.<extension>`
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!(
            "synthetic_patients_{}.{}",
            self.generated_at.format("%Y-%m-%d"),
            format.extension()
        )
    }
}

/// Failure to render a [`PatientBatch`].
#[derive(Debug, Error)]
pub enum BatchExportError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
