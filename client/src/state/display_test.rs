use std::path::PathBuf;

use elements::export::ExportFile;

use super::*;
use crate::extract::mock_elements;
use crate::sink::{MemorySink, SinkError};
use crate::state::notice::NoticeLevel;
use crate::state::upload::ImagePreview;

struct BrokenSink;

impl FileSink for BrokenSink {
    fn save(&mut self, _file: &ExportFile) -> Result<(), SinkError> {
        Err(SinkError::Io {
            path: PathBuf::from("/readonly/x.css"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
    }
}

fn preview() -> ImagePreview {
    ImagePreview { file_name: "a.png".into(), data_url: "data:image/png;base64,".into() }
}

#[test]
fn every_kind_has_an_icon() {
    let icons: Vec<Icon> = ElementKind::ALL.into_iter().map(Icon::from).collect();
    assert_eq!(icons, [Icon::Type, Icon::Palette, Icon::Image, Icon::Settings, Icon::Text, Icon::SwatchBook]);
}

#[test]
fn empty_state_shows_placeholder() {
    assert_eq!(DisplayModel::from_state(&UploadState::Empty), DisplayModel::Empty { message: EMPTY_MESSAGE });
}

#[test]
fn processing_shows_analyzing() {
    let state = UploadState::Processing { image: preview() };
    assert_eq!(DisplayModel::from_state(&state), DisplayModel::Processing { message: ANALYZING_MESSAGE });
}

#[test]
fn ready_without_elements_shows_placeholder() {
    let state = UploadState::Ready { image: preview(), elements: Vec::new() };
    assert_eq!(DisplayModel::from_state(&state), DisplayModel::Empty { message: EMPTY_MESSAGE });
}

#[test]
fn failed_state_carries_message() {
    let state = UploadState::Failed { image: preview(), message: "model offline".into() };
    assert_eq!(DisplayModel::from_state(&state), DisplayModel::Failed { message: "model offline".into() });
}

#[test]
fn ready_lists_elements_in_order_with_swatches() {
    let state = UploadState::Ready { image: preview(), elements: mock_elements().unwrap() };
    let DisplayModel::Elements(cards) = DisplayModel::from_state(&state) else {
        panic!("expected element list");
    };

    let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Primary Font", "Primary Blue", "Hero Image", "Shadow Effect", "Color Scheme"]);
    assert_eq!(cards[0].icon, Icon::Type);
    assert!(cards[0].swatches.is_empty());

    let palette = &cards[4];
    assert_eq!(palette.icon, Icon::SwatchBook);
    assert_eq!(palette.details, "Brand Colors");
    let colors: Vec<_> = palette.swatches.iter().map(|s| s.color.as_str()).collect();
    assert_eq!(colors, ["#2563eb", "#1d4ed8", "#60a5fa", "#f8fafc"]);
}

#[test]
fn unreadable_palette_renders_without_swatches() {
    let mut broken = ExtractedElement::new(ElementKind::Palette, "Broken", "bad");
    broken.value = Some("not json".into());
    assert!(ElementCard::from(&broken).swatches.is_empty());
}

#[test]
fn download_writes_file_and_reports_success() {
    let mut sink = MemorySink::default();
    let notice = download(&ExtractedElement::new(ElementKind::Color, "Primary Blue", "#2563eb"), &mut sink);

    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.title, "Download successful");
    assert_eq!(sink.files.len(), 1);
    assert_eq!(sink.files[0].filename, "primary-blue.css");
}

#[test]
fn malformed_palette_download_fails_without_writing() {
    let mut sink = MemorySink::default();
    let notice = download(&ExtractedElement::new(ElementKind::Palette, "Brand Colors", "4 colors"), &mut sink);

    assert!(notice.is_error());
    assert_eq!(notice.title, "Download failed");
    assert!(sink.files.is_empty());
}

#[test]
fn sink_failure_reports_download_failed() {
    let notice = download(&ExtractedElement::new(ElementKind::Text, "Tagline", "Ship it"), &mut BrokenSink);
    assert!(notice.is_error());
    assert_eq!(notice.title, "Download failed");
}
