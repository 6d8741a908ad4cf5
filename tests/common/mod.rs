#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use sql_mapper::{
    driver::{Connection, ResultRow},
    Error, FieldDescriptor, FieldError, MappingDescriptor, Parameter, Record, Result, Value,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Book {
    pub id: Option<i32>,
    pub name: String,
    pub author: String,
}

impl Book {
    pub fn new(name: &str, author: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            author: author.to_string(),
        }
    }
}

impl Record for Book {
    fn descriptor() -> MappingDescriptor {
        MappingDescriptor::new("book")
            .field(FieldDescriptor::of::<Option<i32>>("id").read_only().primary_key())
            .field(FieldDescriptor::of::<String>("name"))
            .field(FieldDescriptor::of::<String>("author"))
    }

    fn instantiate() -> Option<Self> {
        Some(Self::default())
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "author" => Some(self.author.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "id" => self.id = value.try_into()?,
            "name" => self.name = value.try_into()?,
            "author" => self.author = value.try_into()?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

/// One field of every supported kind, primitive and nullable.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sample {
    pub id: i32,
    pub count: i32,
    pub ratio: f32,
    pub score: f64,
    pub active: bool,
    pub label: String,
    pub created_at: NaiveDateTime,
    pub due: NaiveDate,
    pub rank: Option<i32>,
    pub weight: Option<f32>,
    pub mean: Option<f64>,
    pub flagged: Option<bool>,
    pub note: Option<String>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub released: Option<NaiveDate>,
}

pub const SAMPLE_TABLE: &str = "
    CREATE TABLE sample (
        id INTEGER PRIMARY KEY,
        count INTEGER,
        ratio REAL,
        score REAL,
        active INTEGER,
        label TEXT,
        created TEXT,
        due TEXT,
        rank INTEGER,
        weight REAL,
        mean REAL,
        flagged INTEGER,
        note TEXT,
        reviewed_at TEXT,
        released TEXT
    );
";

impl Record for Sample {
    fn descriptor() -> MappingDescriptor {
        MappingDescriptor::new("sample")
            .field(FieldDescriptor::of::<i32>("id").read_only().primary_key())
            .field(FieldDescriptor::of::<i32>("count"))
            .field(FieldDescriptor::of::<f32>("ratio"))
            .field(FieldDescriptor::of::<f64>("score"))
            .field(FieldDescriptor::of::<bool>("active"))
            .field(FieldDescriptor::of::<String>("label"))
            .field(FieldDescriptor::of::<NaiveDateTime>("created_at").column("created"))
            .field(FieldDescriptor::of::<NaiveDate>("due"))
            .field(FieldDescriptor::of::<Option<i32>>("rank"))
            .field(FieldDescriptor::of::<Option<f32>>("weight"))
            .field(FieldDescriptor::of::<Option<f64>>("mean"))
            .field(FieldDescriptor::of::<Option<bool>>("flagged"))
            .field(FieldDescriptor::of::<Option<String>>("note"))
            .field(FieldDescriptor::of::<Option<NaiveDateTime>>("reviewed_at"))
            .field(FieldDescriptor::of::<Option<NaiveDate>>("released"))
    }

    fn instantiate() -> Option<Self> {
        Some(Self::default())
    }

    fn get(&self, field: &str) -> Option<Value> {
        let value = match field {
            "id" => self.id.into(),
            "count" => self.count.into(),
            "ratio" => self.ratio.into(),
            "score" => self.score.into(),
            "active" => self.active.into(),
            "label" => self.label.clone().into(),
            "created_at" => self.created_at.into(),
            "due" => self.due.into(),
            "rank" => self.rank.into(),
            "weight" => self.weight.into(),
            "mean" => self.mean.into(),
            "flagged" => self.flagged.into(),
            "note" => self.note.clone().into(),
            "reviewed_at" => self.reviewed_at.into(),
            "released" => self.released.into(),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "id" => self.id = value.try_into()?,
            "count" => self.count = value.try_into()?,
            "ratio" => self.ratio = value.try_into()?,
            "score" => self.score = value.try_into()?,
            "active" => self.active = value.try_into()?,
            "label" => self.label = value.try_into()?,
            "created_at" => self.created_at = value.try_into()?,
            "due" => self.due = value.try_into()?,
            "rank" => self.rank = value.try_into()?,
            "weight" => self.weight = value.try_into()?,
            "mean" => self.mean = value.try_into()?,
            "flagged" => self.flagged = value.try_into()?,
            "note" => self.note = value.try_into()?,
            "reviewed_at" => self.reviewed_at = value.try_into()?,
            "released" => self.released = value.try_into()?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

pub fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_milli_opt(h, min, s, ms))
        .expect("valid timestamp")
}

/// A driver that records what it is asked to do and serves canned rows.
#[derive(Default)]
pub struct Recording {
    pub prepared: Vec<String>,
    pub executed: Vec<(String, Vec<Parameter>)>,
    pub rows: Vec<Vec<Parameter>>,
    pub closes: Arc<AtomicUsize>,
}

impl Recording {
    pub fn with_rows(rows: Vec<Vec<Parameter>>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }
}

impl Connection for Recording {
    type Statement = String;

    fn prepare(&mut self, sql: &str) -> Result<String> {
        self.prepared.push(sql.to_string());
        Ok(sql.to_string())
    }

    fn execute(&mut self, statement: &String, params: &[Parameter]) -> Result<usize> {
        self.executed.push((statement.clone(), params.to_vec()));
        Ok(1)
    }

    fn query(
        &mut self,
        statement: &String,
        params: &[Parameter],
        each: &mut dyn FnMut(&dyn ResultRow) -> Result<()>,
    ) -> Result<()> {
        self.executed.push((statement.clone(), params.to_vec()));
        for cells in &self.rows {
            each(&Cells(cells))?;
        }
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Cells<'a>(&'a [Parameter]);

impl Cells<'_> {
    fn cell(&self, index: usize) -> Result<&Parameter> {
        self.0
            .get(index)
            .ok_or_else(|| Error::driver(format!("no column {index}")))
    }
}

macro_rules! getter {
    ($name:ident, $ty:ty, $variant:ident) => {
        fn $name(&self, index: usize) -> Result<Option<$ty>> {
            match self.cell(index)? {
                Parameter::$variant(v) => Ok(Some(v.clone())),
                Parameter::Null => Ok(None),
                other => Err(Error::driver(format!("column {index} holds {other:?}"))),
            }
        }
    };
}

impl ResultRow for Cells<'_> {
    getter!(get_int, i32, Int);
    getter!(get_float, f32, Float);
    getter!(get_double, f64, Double);
    getter!(get_bool, bool, Bool);
    getter!(get_text, String, Text);
    getter!(get_timestamp, NaiveDateTime, Timestamp);
    getter!(get_date, NaiveDate, Date);
}
