//! SQL schema for the outbreak SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS districts (
    district_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    district_name TEXT NOT NULL UNIQUE
);

-- Deleting a district detaches its divisions.
CREATE TABLE IF NOT EXISTS divisions (
    division_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    division_name TEXT NOT NULL,
    district_id   INTEGER REFERENCES districts(district_id) ON DELETE SET NULL,
    UNIQUE (district_id, division_name)
);

-- Deleting a division detaches its users.
CREATE TABLE IF NOT EXISTS users (
    user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name   TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL,
    division_id INTEGER REFERENCES divisions(division_id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS alerts (
    alert_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    alert_type        TEXT NOT NULL,
    alert_description TEXT NOT NULL,
    district_id       INTEGER NOT NULL
                      REFERENCES districts(district_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS articles (
    article_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    image       TEXT,
    author_name TEXT NOT NULL
);

-- district_name is captured at insert so records outlive their district.
CREATE TABLE IF NOT EXISTS case_records (
    case_record_id INTEGER PRIMARY KEY AUTOINCREMENT,
    district_id    INTEGER REFERENCES districts(district_id) ON DELETE SET NULL,
    district_name  TEXT NOT NULL,
    year           INTEGER NOT NULL,
    month          INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    week           INTEGER,
    case_count     INTEGER NOT NULL CHECK (case_count >= 0)
);

CREATE UNIQUE INDEX IF NOT EXISTS case_records_slot_idx
    ON case_records(district_id, year, month, COALESCE(week, -1));
CREATE INDEX IF NOT EXISTS case_records_year_idx ON case_records(year);

CREATE TABLE IF NOT EXISTS case_tallies (
    case_tally_id INTEGER PRIMARY KEY AUTOINCREMENT,
    district_id   INTEGER NOT NULL
                  REFERENCES districts(district_id) ON DELETE CASCADE,
    year          INTEGER NOT NULL,
    month         TEXT NOT NULL,   -- full English name
    case_count    INTEGER NOT NULL CHECK (case_count >= 0),
    UNIQUE (district_id, year, month)
);

-- One row per prediction slot across all districts.
CREATE TABLE IF NOT EXISTS weather_records (
    weather_record_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    district_id           INTEGER NOT NULL
                          REFERENCES districts(district_id) ON DELETE CASCADE,
    predict_year          INTEGER NOT NULL,
    predict_month         INTEGER NOT NULL,
    predict_week          INTEGER NOT NULL,
    avg_max_temp          INTEGER,
    avg_min_temp          INTEGER,
    avg_apparent_max_temp INTEGER,
    avg_apparent_min_temp INTEGER,
    total_precipitation   INTEGER,
    avg_wind_speed        INTEGER,
    max_wind_gusts        INTEGER,
    weather_code          INTEGER,
    cases_last_week       INTEGER,
    cases_last_2_weeks    INTEGER,
    cases_3_week_avg      REAL,
    cases_5_week_avg      REAL,
    cases_diff_1_week     INTEGER,
    UNIQUE (predict_month, predict_week, predict_year)
);

CREATE INDEX IF NOT EXISTS weather_district_idx ON weather_records(district_id);

PRAGMA user_version = 1;
";
