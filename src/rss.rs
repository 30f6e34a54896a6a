//! RSS 2.0 serialization.
//!
//! Free-text fields (titles, descriptions) are CDATA-wrapped; link URLs are
//! written raw except for magnet links, which also go into CDATA. A literal
//! `]]>` inside wrapped text is NOT escaped and produces invalid XML — known
//! limitation, kept for parity with the feeds this replaces.

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::extract::ChannelMeta;
use crate::feed::FeedItem;

type XmlResult = Result<(), quick_xml::Error>;

/// Assemble the channel and its items into an RSS 2.0 document.
pub fn serialize(
    meta: &ChannelMeta,
    items: &[FeedItem],
    last_build_date: &str,
) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_cdata(&mut writer, "title", &meta.title)?;
    write_raw(&mut writer, "link", &meta.link)?;
    write_cdata(&mut writer, "description", &meta.description)?;
    write_raw(&mut writer, "lastBuildDate", last_build_date)?;

    for item in items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;
    Ok(writer.into_inner())
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &FeedItem) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("item")))?;
    write_cdata(writer, "title", &item.title)?;
    if item.magnet {
        write_cdata(writer, "link", &item.link)?;
    } else {
        write_raw(writer, "link", &item.link)?;
    }

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(&item.guid)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    write_raw(writer, "pubDate", &item.pub_date)?;

    if let Some(url) = &item.enclosure {
        let mut enclosure = BytesStart::new("enclosure");
        enclosure.push_attribute(("url", url.as_str()));
        enclosure.push_attribute(("type", "application/x-bittorrent"));
        writer.write_event(Event::Empty(enclosure))?;
    }

    write_cdata(writer, "description", &item.description)?;
    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn write_cdata<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::CData(BytesCData::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write element content verbatim, without entity escaping.
fn write_raw<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
