//! Anki collection database (schema version 11) holding one deck.

use crate::domain::model::{CardModel, Deck, FIELD_SEPARATOR};
use crate::utils::error::Result;
use crate::utils::ids::IdSequence;
use chrono::{DateTime, Utc};
use regex::Regex;
use rusqlite::{params, Connection, Transaction};
use serde_json::{json, Map, Value};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::LazyLock;

const SCHEMA_VERSION: i64 = 11;
const DEFAULT_DECK_ID: i64 = 1;
const DEFAULT_CONF_ID: i64 = 1;

const SCHEMA: &str = r#"
CREATE TABLE col (
    id              integer primary key,
    crt             integer not null,
    mod             integer not null,
    scm             integer not null,
    ver             integer not null,
    dty             integer not null,
    usn             integer not null,
    ls              integer not null,
    conf            text not null,
    models          text not null,
    decks           text not null,
    dconf           text not null,
    tags            text not null
);
CREATE TABLE notes (
    id              integer primary key,
    guid            text not null,
    mid             integer not null,
    mod             integer not null,
    usn             integer not null,
    tags            text not null,
    flds            text not null,
    sfld            integer not null,
    csum            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE cards (
    id              integer primary key,
    nid             integer not null,
    did             integer not null,
    ord             integer not null,
    mod             integer not null,
    usn             integer not null,
    type            integer not null,
    queue           integer not null,
    due             integer not null,
    ivl             integer not null,
    factor          integer not null,
    reps            integer not null,
    lapses          integer not null,
    left            integer not null,
    odue            integer not null,
    odid            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE revlog (
    id              integer primary key,
    cid             integer not null,
    usn             integer not null,
    time            integer not null,
    ivl             integer not null,
    factor          integer not null,
    ease            integer not null,
    type            integer not null,
    lastIvl         integer not null
);
CREATE TABLE graves (
    usn             integer not null,
    oid             integer not null,
    type            integer not null
);
CREATE INDEX ix_notes_usn on notes (usn);
CREATE INDEX ix_cards_usn on cards (usn);
CREATE INDEX ix_revlog_usn on revlog (usn);
CREATE INDEX ix_cards_nid on cards (nid);
CREATE INDEX ix_cards_sched on cards (did, queue, due);
CREATE INDEX ix_revlog_cid on revlog (cid);
CREATE INDEX ix_notes_csum on notes (csum);
"#;

const BASE91_TABLE: &[u8; 91] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";
const LATEX_POST: &str = "\\end{document}";

static TEMPLATE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("template field pattern"));
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment pattern"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("html tag pattern"));

/// Creates the collection database at `path` and fills it with `deck`.
pub fn write_collection(path: &Path, deck: &Deck, now: DateTime<Utc>) -> Result<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;

    let tx = conn.transaction()?;
    insert_col(&tx, deck, now)?;
    insert_notes(&tx, deck, now)?;
    tx.commit()?;

    conn.close().map_err(|(_, e)| e)?;
    Ok(())
}

fn insert_col(tx: &Transaction<'_>, deck: &Deck, now: DateTime<Utc>) -> Result<()> {
    let secs = now.timestamp();
    let millis = now.timestamp_millis();
    let models = deck.models();

    let mut models_json = Map::new();
    for model in &models {
        models_json.insert(model.id.to_string(), model_json(model, deck.id, secs));
    }

    let mut decks_json = Map::new();
    decks_json.insert(
        DEFAULT_DECK_ID.to_string(),
        deck_json(DEFAULT_DECK_ID, "Default", secs),
    );
    decks_json.insert(deck.id.to_string(), deck_json(deck.id, &deck.name, secs));

    let cur_model = models
        .first()
        .map(|m| m.id.to_string())
        .unwrap_or_default();

    tx.execute(
        "INSERT INTO col VALUES (NULL, ?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?6, ?7, ?8, '{}')",
        params![
            secs - secs.rem_euclid(86_400),
            millis,
            millis,
            SCHEMA_VERSION,
            serde_json::to_string(&collection_conf(deck.id, &cur_model))?,
            serde_json::to_string(&Value::Object(models_json))?,
            serde_json::to_string(&Value::Object(decks_json))?,
            serde_json::to_string(&default_deck_conf())?,
        ],
    )?;
    Ok(())
}

fn insert_notes(tx: &Transaction<'_>, deck: &Deck, now: DateTime<Utc>) -> Result<()> {
    let secs = now.timestamp();
    let mut note_ids = IdSequence::starting_at(now.timestamp_millis());
    let mut card_ids = IdSequence::starting_at(now.timestamp_millis());

    let mut note_stmt = tx.prepare(
        "INSERT INTO notes VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
    )?;
    let separator = FIELD_SEPARATOR.to_string();
    let mut card_stmt = tx.prepare(
        "INSERT INTO cards VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
    )?;

    for (position, note) in deck.notes().iter().enumerate() {
        let note_id = note_ids.next_id();
        let fields = note.fields();
        let sort_field = fields.first().map(|f| strip_html(f)).unwrap_or_default();

        note_stmt.execute(params![
            note_id,
            guid_for(fields),
            note.model().id,
            secs,
            fields.join(separator.as_str()),
            sort_field,
            field_checksum(&sort_field),
        ])?;

        for ord in 0..note.model().templates.len() {
            card_stmt.execute(params![
                card_ids.next_id(),
                note_id,
                deck.id,
                ord as i64,
                secs,
                position as i64 + 1,
            ])?;
        }
    }

    tracing::debug!("Inserted {} notes into collection", deck.notes().len());
    Ok(())
}

fn model_json(model: &CardModel, deck_id: i64, secs: i64) -> Value {
    let fields: Vec<Value> = model
        .fields
        .iter()
        .enumerate()
        .map(|(ord, field)| {
            json!({
                "name": field.name,
                "ord": ord,
                "font": "Arial",
                "media": [],
                "rtl": false,
                "size": 20,
                "sticky": false,
            })
        })
        .collect();

    let templates: Vec<Value> = model
        .templates
        .iter()
        .enumerate()
        .map(|(ord, template)| {
            json!({
                "name": template.name,
                "ord": ord,
                "qfmt": template.qfmt,
                "afmt": template.afmt,
                "bqfmt": "",
                "bafmt": "",
                "did": null,
            })
        })
        .collect();

    json!({
        "id": model.id.to_string(),
        "name": model.name,
        "type": 0,
        "mod": secs,
        "usn": -1,
        "sortf": 0,
        "did": deck_id,
        "tmpls": templates,
        "flds": fields,
        "css": model.css,
        "latexPre": LATEX_PRE,
        "latexPost": LATEX_POST,
        "tags": [],
        "vers": [],
        "req": required_fields(model),
    })
}

/// For each template, the field ordinals its question side references.
fn required_fields(model: &CardModel) -> Value {
    let reqs: Vec<Value> = model
        .templates
        .iter()
        .enumerate()
        .map(|(ord, template)| {
            let mut referenced: Vec<usize> = Vec::new();
            for caps in TEMPLATE_FIELD.captures_iter(&template.qfmt) {
                let tag = caps[1].trim();
                if tag.starts_with('/') {
                    continue;
                }
                let name = tag.trim_start_matches(['#', '^']);
                let name = name.rsplit(':').next().unwrap_or(name).trim();
                if let Some(idx) = model.fields.iter().position(|f| f.name == name) {
                    if !referenced.contains(&idx) {
                        referenced.push(idx);
                    }
                }
            }

            if referenced.is_empty() {
                json!([ord, "none", []])
            } else {
                json!([ord, "any", referenced])
            }
        })
        .collect();
    Value::Array(reqs)
}

fn deck_json(id: i64, name: &str, secs: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "desc": "",
        "mod": secs,
        "usn": -1,
        "dyn": 0,
        "conf": DEFAULT_CONF_ID,
        "collapsed": false,
        "extendNew": 10,
        "extendRev": 50,
        "newToday": [0, 0],
        "revToday": [0, 0],
        "lrnToday": [0, 0],
        "timeToday": [0, 0],
    })
}

fn collection_conf(deck_id: i64, cur_model: &str) -> Value {
    json!({
        "activeDecks": [deck_id],
        "curDeck": deck_id,
        "curModel": cur_model,
        "addToCur": true,
        "collapseTime": 1200,
        "dueCounts": true,
        "estTimes": true,
        "newBury": true,
        "newSpread": 0,
        "nextPos": 1,
        "sortBackwards": false,
        "sortType": "noteFld",
        "timeLim": 0,
    })
}

fn default_deck_conf() -> Value {
    let mut confs = Map::new();
    confs.insert(
        DEFAULT_CONF_ID.to_string(),
        json!({
            "id": DEFAULT_CONF_ID,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "replayq": true,
            "timer": 0,
            "new": {
                "bury": true,
                "delays": [1, 10],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true,
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100,
            },
            "lapse": {
                "delays": [10],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0,
            },
        }),
    );
    Value::Object(confs)
}

/// Stable note guid derived from the field values.
pub(crate) fn guid_for(fields: &[String]) -> String {
    let digest = Sha256::digest(fields.join("__").as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    base91(u64::from_be_bytes(head))
}

fn base91(mut num: u64) -> String {
    let mut buf = Vec::new();
    while num > 0 {
        buf.push(BASE91_TABLE[(num % 91) as usize]);
        num /= 91;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

pub(crate) fn strip_html(text: &str) -> String {
    let text = HTML_COMMENT.replace_all(text, "");
    let text = HTML_TAG.replace_all(&text, "");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// First 32 bits of the SHA-1 of the sort field, as Anki stores in `csum`.
pub(crate) fn field_checksum(sort_field: &str) -> i64 {
    let digest = Sha1::digest(sort_field.as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}
