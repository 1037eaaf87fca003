use crate::record::tags::PIXEL_DATA;
use dicom_object::InMemDicomObject;
use log::debug;

/// Removes the pixel data element, returning whether it was present
pub fn remove_pixel_data(dcm: &mut InMemDicomObject) -> bool {
    let removed = dcm.remove_element(PIXEL_DATA);
    if removed {
        debug!("Removed pixel data");
    }
    removed
}
