// UPnP device description document
//
// Fetched from the `LOCATION` URL advertised in a discovery reply. Only the
// first `<device>` element is consulted; embedded devices are ignored.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Fields read from the first `<device>` of a description document.
///
/// Each field is `None` when the element is missing or has no text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceDescription {
    pub friendly_name: Option<String>,
    pub manufacturer: Option<String>,
    pub model_name: Option<String>,
    pub model_number: Option<String>,
    pub udn: Option<String>,
}

impl DeviceDescription {
    /// Parse a description document.
    ///
    /// A well-formed document without a `<device>` element yields an empty
    /// description; only malformed XML is an error.
    pub fn parse(xml: &str) -> Result<Self, Error> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| Error::Xml(e.to_string()))?;

        let Some(device) = doc
            .root_element()
            .descendants()
            .find(|n| n.has_tag_name("device"))
        else {
            return Ok(Self::default());
        };

        let text_of = |tag: &str| -> Option<String> {
            let element = device.descendants().find(|n| n.has_tag_name(tag))?;
            let first = element.first_child()?;
            first.is_text().then(|| first.text()).flatten().map(str::to_owned)
        };

        Ok(Self {
            friendly_name: text_of("friendlyName"),
            manufacturer: text_of("manufacturer"),
            model_name: text_of("modelName"),
            model_number: text_of("modelNumber"),
            udn: text_of("UDN"),
        })
    }
}

/// GET and parse the description document at `url`.
pub async fn fetch_description(
    http: &reqwest::Client,
    url: &Url,
) -> Result<DeviceDescription, Error> {
    debug!("GET {}", url);

    let resp = http
        .get(url.clone())
        .send()
        .await
        .map_err(Error::Transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    DeviceDescription::parse(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <specVersion><major>1</major><minor>0</minor></specVersion>
  <device>
    <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
    <friendlyName>Living Room BLOBbox</friendlyName>
    <manufacturer>TVBLOB</manufacturer>
    <modelName>BLOBbox</modelName>
    <modelNumber>1.0</modelNumber>
    <UDN>uuid:blobbox-1_0-000006244034248144</UDN>
    <deviceList>
      <device><friendlyName>Embedded</friendlyName></device>
    </deviceList>
  </device>
</root>"#;

    #[test]
    fn reads_first_device_fields() {
        let description = DeviceDescription::parse(DESCRIPTION).expect("valid XML");
        assert_eq!(
            description.friendly_name.as_deref(),
            Some("Living Room BLOBbox")
        );
        assert_eq!(description.manufacturer.as_deref(), Some("TVBLOB"));
        assert_eq!(description.model_name.as_deref(), Some("BLOBbox"));
        assert_eq!(description.model_number.as_deref(), Some("1.0"));
        assert_eq!(
            description.udn.as_deref(),
            Some("uuid:blobbox-1_0-000006244034248144")
        );
    }

    #[test]
    fn missing_device_is_empty_not_error() {
        let description = DeviceDescription::parse("<root><specVersion/></root>").expect("valid");
        assert_eq!(description, DeviceDescription::default());
    }

    #[test]
    fn missing_or_empty_friendly_name_is_absent() {
        let description =
            DeviceDescription::parse("<root><device><modelName>X</modelName></device></root>")
                .expect("valid");
        assert_eq!(description.friendly_name, None);

        let description =
            DeviceDescription::parse("<root><device><friendlyName/></device></root>")
                .expect("valid");
        assert_eq!(description.friendly_name, None);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let result = DeviceDescription::parse("<root><device>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }
}
