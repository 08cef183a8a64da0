//! Standard DICOM data dictionary table
//!
//! A representative subset of the registry of DICOM data elements
//! (PS3.6), covering the file meta, patient, study, series, acquisition,
//! image, overlay and pixel-data groups.

use dicomite_core::Vr;

/// Raw dictionary row, expanded into a `DictionaryEntry` at load time
pub(crate) struct RawEntry {
    pub group: u16,
    pub element: u16,
    pub name: &'static str,
    pub keyword: &'static str,
    pub vr: Vr,
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

const fn row(
    group: u16,
    element: u16,
    name: &'static str,
    keyword: &'static str,
    vr: Vr,
    min: u32,
    max: u32,
    step: u32,
) -> RawEntry {
    RawEntry {
        group,
        element,
        name,
        keyword,
        vr,
        min,
        max,
        step,
    }
}

#[rustfmt::skip]
pub(crate) const STANDARD_ENTRIES: &[RawEntry] = &[
    // File meta information
    row(0x0002, 0x0002, "Media Storage SOP Class UID", "MediaStorageSOPClassUID", Vr::Ui, 1, 1, 1),
    row(0x0002, 0x0003, "Media Storage SOP Instance UID", "MediaStorageSOPInstanceUID", Vr::Ui, 1, 1, 1),
    row(0x0002, 0x0010, "Transfer Syntax UID", "TransferSyntaxUID", Vr::Ui, 1, 1, 1),

    // Identification and acquisition context
    row(0x0008, 0x0008, "Image Type", "ImageType", Vr::Cs, 2, 0, 1),
    row(0x0008, 0x0016, "SOP Class UID", "SOPClassUID", Vr::Ui, 1, 1, 1),
    row(0x0008, 0x0018, "SOP Instance UID", "SOPInstanceUID", Vr::Ui, 1, 1, 1),
    row(0x0008, 0x0020, "Study Date", "StudyDate", Vr::Da, 1, 1, 1),
    row(0x0008, 0x0021, "Series Date", "SeriesDate", Vr::Da, 1, 1, 1),
    row(0x0008, 0x0022, "Acquisition Date", "AcquisitionDate", Vr::Da, 1, 1, 1),
    row(0x0008, 0x0023, "Content Date", "ContentDate", Vr::Da, 1, 1, 1),
    row(0x0008, 0x0030, "Study Time", "StudyTime", Vr::Tm, 1, 1, 1),
    row(0x0008, 0x0031, "Series Time", "SeriesTime", Vr::Tm, 1, 1, 1),
    row(0x0008, 0x0032, "Acquisition Time", "AcquisitionTime", Vr::Tm, 1, 1, 1),
    row(0x0008, 0x0033, "Content Time", "ContentTime", Vr::Tm, 1, 1, 1),
    row(0x0008, 0x0050, "Accession Number", "AccessionNumber", Vr::Sh, 1, 1, 1),
    row(0x0008, 0x0060, "Modality", "Modality", Vr::Cs, 1, 1, 1),
    row(0x0008, 0x0070, "Manufacturer", "Manufacturer", Vr::Lo, 1, 1, 1),
    row(0x0008, 0x0080, "Institution Name", "InstitutionName", Vr::Lo, 1, 1, 1),
    row(0x0008, 0x0090, "Referring Physician's Name", "ReferringPhysicianName", Vr::Pn, 1, 1, 1),
    row(0x0008, 0x1030, "Study Description", "StudyDescription", Vr::Lo, 1, 1, 1),
    row(0x0008, 0x103E, "Series Description", "SeriesDescription", Vr::Lo, 1, 1, 1),
    row(0x0008, 0x1090, "Manufacturer's Model Name", "ManufacturerModelName", Vr::Lo, 1, 1, 1),
    row(0x0008, 0x1110, "Referenced Study Sequence", "ReferencedStudySequence", Vr::Sq, 1, 1, 1),
    row(0x0008, 0x1140, "Referenced Image Sequence", "ReferencedImageSequence", Vr::Sq, 1, 1, 1),
    row(0x0008, 0x1150, "Referenced SOP Class UID", "ReferencedSOPClassUID", Vr::Ui, 1, 1, 1),
    row(0x0008, 0x1155, "Referenced SOP Instance UID", "ReferencedSOPInstanceUID", Vr::Ui, 1, 1, 1),

    // Patient
    row(0x0010, 0x0010, "Patient's Name", "PatientName", Vr::Pn, 1, 1, 1),
    row(0x0010, 0x0020, "Patient ID", "PatientID", Vr::Lo, 1, 1, 1),
    row(0x0010, 0x0030, "Patient's Birth Date", "PatientBirthDate", Vr::Da, 1, 1, 1),
    row(0x0010, 0x0040, "Patient's Sex", "PatientSex", Vr::Cs, 1, 1, 1),
    row(0x0010, 0x1010, "Patient's Age", "PatientAge", Vr::As, 1, 1, 1),
    row(0x0010, 0x1020, "Patient's Size", "PatientSize", Vr::Ds, 1, 1, 1),
    row(0x0010, 0x1030, "Patient's Weight", "PatientWeight", Vr::Ds, 1, 1, 1),
    row(0x0010, 0x4000, "Patient Comments", "PatientComments", Vr::Lt, 1, 1, 1),

    // Acquisition
    row(0x0018, 0x0015, "Body Part Examined", "BodyPartExamined", Vr::Cs, 1, 1, 1),
    row(0x0018, 0x0050, "Slice Thickness", "SliceThickness", Vr::Ds, 1, 1, 1),
    row(0x0018, 0x0060, "KVP", "KVP", Vr::Ds, 1, 1, 1),
    row(0x0018, 0x0088, "Spacing Between Slices", "SpacingBetweenSlices", Vr::Ds, 1, 1, 1),
    row(0x0018, 0x1030, "Protocol Name", "ProtocolName", Vr::Lo, 1, 1, 1),
    row(0x0018, 0x1149, "Field of View Dimension(s)", "FieldOfViewDimensions", Vr::Is, 1, 2, 1),
    row(0x0018, 0x1151, "X-Ray Tube Current", "XRayTubeCurrent", Vr::Is, 1, 1, 1),
    row(0x0018, 0x5100, "Patient Position", "PatientPosition", Vr::Cs, 1, 1, 1),

    // Relationship
    row(0x0020, 0x000D, "Study Instance UID", "StudyInstanceUID", Vr::Ui, 1, 1, 1),
    row(0x0020, 0x000E, "Series Instance UID", "SeriesInstanceUID", Vr::Ui, 1, 1, 1),
    row(0x0020, 0x0010, "Study ID", "StudyID", Vr::Sh, 1, 1, 1),
    row(0x0020, 0x0011, "Series Number", "SeriesNumber", Vr::Is, 1, 1, 1),
    row(0x0020, 0x0013, "Instance Number", "InstanceNumber", Vr::Is, 1, 1, 1),
    row(0x0020, 0x0032, "Image Position (Patient)", "ImagePositionPatient", Vr::Ds, 3, 3, 1),
    row(0x0020, 0x0037, "Image Orientation (Patient)", "ImageOrientationPatient", Vr::Ds, 6, 6, 1),
    row(0x0020, 0x0052, "Frame of Reference UID", "FrameOfReferenceUID", Vr::Ui, 1, 1, 1),
    row(0x0020, 0x1041, "Slice Location", "SliceLocation", Vr::Ds, 1, 1, 1),

    // Image presentation
    row(0x0028, 0x0002, "Samples per Pixel", "SamplesPerPixel", Vr::Us, 1, 1, 1),
    row(0x0028, 0x0004, "Photometric Interpretation", "PhotometricInterpretation", Vr::Cs, 1, 1, 1),
    row(0x0028, 0x0008, "Number of Frames", "NumberOfFrames", Vr::Is, 1, 1, 1),
    row(0x0028, 0x0010, "Rows", "Rows", Vr::Us, 1, 1, 1),
    row(0x0028, 0x0011, "Columns", "Columns", Vr::Us, 1, 1, 1),
    row(0x0028, 0x0030, "Pixel Spacing", "PixelSpacing", Vr::Ds, 2, 2, 1),
    row(0x0028, 0x0100, "Bits Allocated", "BitsAllocated", Vr::Us, 1, 1, 1),
    row(0x0028, 0x0101, "Bits Stored", "BitsStored", Vr::Us, 1, 1, 1),
    row(0x0028, 0x0102, "High Bit", "HighBit", Vr::Us, 1, 1, 1),
    row(0x0028, 0x0103, "Pixel Representation", "PixelRepresentation", Vr::Us, 1, 1, 1),
    row(0x0028, 0x1050, "Window Center", "WindowCenter", Vr::Ds, 1, 0, 1),
    row(0x0028, 0x1051, "Window Width", "WindowWidth", Vr::Ds, 1, 0, 1),
    row(0x0028, 0x1052, "Rescale Intercept", "RescaleIntercept", Vr::Ds, 1, 1, 1),
    row(0x0028, 0x1053, "Rescale Slope", "RescaleSlope", Vr::Ds, 1, 1, 1),

    // Procedure
    row(0x0032, 0x1060, "Requested Procedure Description", "RequestedProcedureDescription", Vr::Lo, 1, 1, 1),
    row(0x0040, 0x0244, "Performed Procedure Step Start Date", "PerformedProcedureStepStartDate", Vr::Da, 1, 1, 1),
    row(0x0040, 0x0254, "Performed Procedure Step Description", "PerformedProcedureStepDescription", Vr::Lo, 1, 1, 1),
    row(0x0040, 0xA730, "Content Sequence", "ContentSequence", Vr::Sq, 1, 1, 1),

    // Overlay (first repeating group)
    row(0x6000, 0x0010, "Overlay Rows", "OverlayRows", Vr::Us, 1, 1, 1),
    row(0x6000, 0x0011, "Overlay Columns", "OverlayColumns", Vr::Us, 1, 1, 1),
    row(0x6000, 0x0022, "Overlay Description", "OverlayDescription", Vr::Lo, 1, 1, 1),
    row(0x6000, 0x0040, "Overlay Type", "OverlayType", Vr::Cs, 1, 1, 1),
    row(0x6000, 0x0045, "Overlay Subtype", "OverlaySubtype", Vr::Lo, 1, 1, 1),
    row(0x6000, 0x0050, "Overlay Origin", "OverlayOrigin", Vr::Ss, 2, 2, 1),
    row(0x6000, 0x0051, "Image Frame Origin", "ImageFrameOrigin", Vr::Us, 1, 1, 1),
    row(0x6000, 0x0100, "Overlay Bits Allocated", "OverlayBitsAllocated", Vr::Us, 1, 1, 1),
    row(0x6000, 0x0102, "Overlay Bit Position", "OverlayBitPosition", Vr::Us, 1, 1, 1),
    row(0x6000, 0x1301, "ROI Area", "ROIArea", Vr::Is, 1, 1, 1),
    row(0x6000, 0x1302, "ROI Mean", "ROIMean", Vr::Ds, 1, 1, 1),
    row(0x6000, 0x1303, "ROI Standard Deviation", "ROIStandardDeviation", Vr::Ds, 1, 1, 1),
    row(0x6000, 0x1500, "Overlay Label", "OverlayLabel", Vr::Lo, 1, 1, 1),
    row(0x6000, 0x3000, "Overlay Data", "OverlayData", Vr::Ob, 1, 1, 1),

    // Pixel data
    row(0x7FE0, 0x0010, "Pixel Data", "PixelData", Vr::Ow, 1, 1, 1),
];
