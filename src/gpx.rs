use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::error::MaptyError;
use crate::record::WorkoutRecord;
use crate::view;

const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";
const CREATOR: &str = "mapty-wasm";

type Result<T> = std::result::Result<T, MaptyError>;

fn xml_err(e: impl std::fmt::Display) -> MaptyError {
    MaptyError::Export {
        format: "GPX",
        message: e.to_string(),
    }
}

/// Export the workout list as a GPX 1.1 document with one waypoint per workout.
pub fn to_gpx(records: &[WorkoutRecord]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("creator", CREATOR));
    root.push_attribute(("xmlns", GPX_NS));
    writer.write_event(Event::Start(root)).map_err(xml_err)?;

    for record in records {
        write_waypoint(&mut writer, record)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("gpx")))
        .map_err(xml_err)?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(xml_err)
}

fn write_waypoint<W: std::io::Write>(writer: &mut Writer<W>, record: &WorkoutRecord) -> Result<()> {
    let lat = record.coordinates.lat.to_string();
    let lon = record.coordinates.lng.to_string();
    let mut wpt = BytesStart::new("wpt");
    wpt.push_attribute(("lat", lat.as_str()));
    wpt.push_attribute(("lon", lon.as_str()));
    writer.write_event(Event::Start(wpt)).map_err(xml_err)?;

    // Stored timestamps are not re-validated; skip anything that is not RFC 3339.
    if chrono::DateTime::parse_from_rfc3339(&record.created_at).is_ok() {
        write_element(writer, "time", &record.created_at)?;
    }
    write_element(writer, "name", &record.description)?;
    write_element(writer, "desc", &view::summary_for(record))?;
    write_element(writer, "type", record.kind.tag())?;

    writer
        .write_event(Event::End(BytesEnd::new("wpt")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Coords, Workout};
    use chrono::{Local, TimeZone};

    fn run_record() -> WorkoutRecord {
        let t = Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        WorkoutRecord::from(&Workout::running(Coords::new(51.5, -0.1), t, 5.0, 30.0, 150.0))
    }

    #[test]
    fn test_waypoint_per_workout() {
        let gpx = to_gpx(&[run_record(), run_record()]).unwrap();
        assert!(gpx.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(gpx.matches("<wpt ").count(), 2);
        assert!(gpx.contains(r#"<wpt lat="51.5" lon="-0.1">"#));
        assert!(gpx.contains("<name>Running on April 14</name>"));
        assert!(gpx.contains("<type>running</type>"));
        assert!(gpx.contains("<time>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut rec = run_record();
        rec.description = "Run <fast> & far".to_string();
        let gpx = to_gpx(&[rec]).unwrap();
        assert!(gpx.contains("<name>Run &lt;fast&gt; &amp; far</name>"));
    }

    #[test]
    fn test_bad_timestamp_is_skipped() {
        let mut rec = run_record();
        rec.created_at = "yesterday".to_string();
        let gpx = to_gpx(&[rec]).unwrap();
        assert!(!gpx.contains("<time>"));
    }

    #[test]
    fn test_empty_list() {
        let gpx = to_gpx(&[]).unwrap();
        assert!(gpx.contains("<gpx"));
        assert!(!gpx.contains("<wpt"));
    }
}
