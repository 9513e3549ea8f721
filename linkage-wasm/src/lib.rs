use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Drawing {
    pub(crate) inner: linkage::Drawing,
}

impl Drawing {
    pub fn rs_new() -> Drawing {
        Drawing { inner: linkage::Drawing::new() }
    }
    pub fn rs_geom_version(&self) -> u64 {
        self.inner.geom_version()
    }
}
