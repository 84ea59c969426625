//! The drawing-surface capabilities the erase coordinator relies on.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use canvas::doc::{EraseStroke, ObjectId};
use canvas::engine::EngineCore;
use canvas::render::{self, RasterError, RgbaImage};

/// Scene-graph operations used while erasing.
///
/// All of these run on the interactive thread.
pub trait EraseSurface {
    /// Add `stroke` to the object's erase mask. Returns false when the object
    /// is gone or refuses erasing.
    fn commit_erase_mask(&mut self, id: &ObjectId, stroke: &EraseStroke) -> bool;

    /// Render the object with its mask and return its RGBA bytes.
    ///
    /// `Ok(None)` means there is nothing to evaluate: the object is gone, not
    /// erasable, or carries no mask.
    ///
    /// # Errors
    ///
    /// Returns a [`RasterError`] when the object cannot be rasterised.
    fn extract_erase_pixels(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, RasterError>;

    /// Remove the object from the scene graph. Returns false if it was
    /// already gone.
    fn remove_object(&mut self, id: &ObjectId) -> bool;

    fn request_redraw(&mut self);
}

impl EraseSurface for EngineCore {
    fn commit_erase_mask(&mut self, id: &ObjectId, stroke: &EraseStroke) -> bool {
        self.commit_erase(id, stroke)
    }

    fn extract_erase_pixels(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, RasterError> {
        let Some(obj) = self.object(id) else {
            return Ok(None);
        };
        Ok(render::extract_erase_pixels(obj)?.map(RgbaImage::into_data))
    }

    fn remove_object(&mut self, id: &ObjectId) -> bool {
        self.delete(id).is_some()
    }

    fn request_redraw(&mut self) {
        EngineCore::request_redraw(self);
    }
}
