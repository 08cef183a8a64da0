use bytes::Bytes;
use dicomite_core::{DicomError, DicomResult, TagId};

const ROI_AREA: TagId = TagId::new(0x6000, 0x1301);
const ROI_MEAN: TagId = TagId::new(0x6000, 0x1302);
const ROI_STANDARD_DEVIATION: TagId = TagId::new(0x6000, 0x1303);

/// A bitmap attached to an overlay frame
///
/// Pixel transform pipelines are out of scope; the image is a plain
/// container for the frame geometry and bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    bits_allocated: u32,
    data: Bytes,
}

impl Image {
    pub fn new(width: u32, height: u32, bits_allocated: u32, data: Bytes) -> Self {
        Self {
            width,
            height,
            bits_allocated,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits_allocated(&self) -> u32 {
        self.bits_allocated
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Overlay purpose, from the Overlay Type attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayType {
    /// Superimposed graphics
    Graphic,
    /// Region of interest
    Roi,
}

/// A DICOM overlay: auxiliary bitmaps superimposed on image frames
///
/// Frames are indexed zero-based relative to `first_frame`; the overlay
/// owns the image attached to each frame. ROI statistics are optional
/// and report a missing-tag error when never set.
#[derive(Debug, Clone)]
pub struct Overlay {
    overlay_type: OverlayType,
    sub_type: String,
    label: String,
    description: String,
    first_frame: u32,
    origin_x: i32,
    origin_y: i32,
    roi_area: Option<u32>,
    roi_mean: Option<f64>,
    roi_standard_deviation: Option<f64>,
    frames: Vec<Image>,
}

impl Overlay {
    pub fn new(
        overlay_type: OverlayType,
        sub_type: &str,
        first_frame: u32,
        origin_x: i32,
        origin_y: i32,
        label: &str,
        description: &str,
    ) -> Self {
        Self {
            overlay_type,
            sub_type: sub_type.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            first_frame,
            origin_x,
            origin_y,
            roi_area: None,
            roi_mean: None,
            roi_standard_deviation: None,
            frames: Vec::new(),
        }
    }

    pub fn overlay_type(&self) -> OverlayType {
        self.overlay_type
    }

    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Zero-based number of the first image frame related to this overlay
    pub fn first_frame(&self) -> u32 {
        self.first_frame
    }

    /// Number of bitmaps stored in the overlay
    pub fn frames_count(&self) -> usize {
        self.frames.len()
    }

    pub fn origin_x(&self) -> i32 {
        self.origin_x
    }

    pub fn origin_y(&self) -> i32 {
        self.origin_y
    }

    /// Retrieve one of the overlay bitmaps
    pub fn image(&self, frame: usize) -> DicomResult<&Image> {
        self.frames.get(frame).ok_or(DicomError::FrameRange {
            frame,
            frames_count: self.frames.len(),
        })
    }

    /// Attach a bitmap to a frame; `frame` may extend the list by one
    pub fn set_image(&mut self, frame: usize, image: Image) -> DicomResult<()> {
        if frame < self.frames.len() {
            self.frames[frame] = image;
            Ok(())
        } else if frame == self.frames.len() {
            self.frames.push(image);
            Ok(())
        } else {
            Err(DicomError::FrameRange {
                frame,
                frames_count: self.frames.len(),
            })
        }
    }

    /// Number of pixels in the ROI area
    pub fn roi_area(&self) -> DicomResult<u32> {
        self.roi_area.ok_or(DicomError::MissingTag { tag: ROI_AREA })
    }

    pub fn set_roi_area(&mut self, area: u32) {
        self.roi_area = Some(area);
    }

    /// Mean value of the pixels in the ROI area
    pub fn roi_mean(&self) -> DicomResult<f64> {
        self.roi_mean.ok_or(DicomError::MissingTag { tag: ROI_MEAN })
    }

    pub fn set_roi_mean(&mut self, mean: f64) {
        self.roi_mean = Some(mean);
    }

    /// Standard deviation of the pixels in the ROI area
    pub fn roi_standard_deviation(&self) -> DicomResult<f64> {
        self.roi_standard_deviation.ok_or(DicomError::MissingTag {
            tag: ROI_STANDARD_DEVIATION,
        })
    }

    pub fn set_roi_standard_deviation(&mut self, standard_deviation: f64) {
        self.roi_standard_deviation = Some(standard_deviation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(value: u8) -> Image {
        Image::new(2, 2, 1, Bytes::from(vec![value]))
    }

    #[test]
    fn test_frame_range() {
        let mut overlay = Overlay::new(OverlayType::Roi, "", 0, 10, 20, "L", "D");
        overlay.set_image(0, bitmap(1)).unwrap();
        overlay.set_image(1, bitmap(2)).unwrap();

        assert_eq!(overlay.frames_count(), 2);
        assert_eq!(overlay.image(1).unwrap(), &bitmap(2));
        assert!(matches!(
            overlay.image(2),
            Err(DicomError::FrameRange {
                frame: 2,
                frames_count: 2
            })
        ));
        // A gap cannot be created either
        assert!(overlay.set_image(5, bitmap(3)).is_err());
    }

    #[test]
    fn test_image_returned_unchanged() {
        let mut overlay = Overlay::new(OverlayType::Graphic, "USER", 3, 0, 0, "", "");
        let image = Image::new(4, 4, 1, Bytes::from_static(&[0xAB, 0xCD]));
        overlay.set_image(0, image.clone()).unwrap();
        assert_eq!(overlay.image(0).unwrap(), &image);
        assert_eq!(overlay.first_frame(), 3);
    }

    #[test]
    fn test_roi_statistics() {
        let mut overlay = Overlay::new(OverlayType::Roi, "", 0, 0, 0, "", "");
        assert!(matches!(
            overlay.roi_area(),
            Err(DicomError::MissingTag { .. })
        ));

        overlay.set_roi_area(120);
        overlay.set_roi_mean(42.5);
        overlay.set_roi_standard_deviation(3.25);
        assert_eq!(overlay.roi_area().unwrap(), 120);
        assert_eq!(overlay.roi_mean().unwrap(), 42.5);
        assert_eq!(overlay.roi_standard_deviation().unwrap(), 3.25);
    }
}
