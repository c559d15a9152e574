//! Table definitions.
//!
//! Every statement is `CREATE ... IF NOT EXISTS`, so applying the schema
//! to a store that already has it changes nothing. Existing tables are never
//! altered.

#[cfg(test)]
pub(crate) const TABLES: [&str; 4] = ["campaigns", "customers", "leads", "assets"];

pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS campaigns (
    campaign_id INTEGER PRIMARY KEY AUTOINCREMENT,
    campaign_name VARCHAR(255) NOT NULL,
    start_date DATE,
    end_date DATE,
    budget REAL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS customers (
    customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) UNIQUE NOT NULL,
    demographics TEXT,
    source_of_acquisition VARCHAR(255)
);

CREATE TABLE IF NOT EXISTS leads (
    lead_id INTEGER PRIMARY KEY AUTOINCREMENT,
    campaign_id INTEGER REFERENCES campaigns(campaign_id),
    contact_info VARCHAR(255),
    lead_source VARCHAR(255),
    status VARCHAR(50),
    lead_score INTEGER
);

CREATE TABLE IF NOT EXISTS assets (
    asset_id INTEGER PRIMARY KEY AUTOINCREMENT,
    asset_name VARCHAR(255),
    description TEXT,
    file_type VARCHAR(50),
    file_path VARCHAR(255)
);
"#;
