// mapper.rs
use crate::advertise::AdvertiseModel;
use crate::record::{AdvertiseAttributes, AdvertiseRecord};

/// Conversión entre el modelo de API y el registro persistido. Se inyecta en
/// el servicio; las implementaciones deben ser puras.
pub trait AdvertiseMapper: Send + Sync {
  /// Campos persistibles de un anuncio entrante.
  fn to_attributes(&self, model: &AdvertiseModel) -> AdvertiseAttributes;

  /// Modelo de API a partir de un registro leído.
  fn to_model(&self, record: &AdvertiseRecord) -> AdvertiseModel;
}

/// Mapper campo a campo.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper;

impl AdvertiseMapper for FieldMapper {
  fn to_attributes(&self, model: &AdvertiseModel) -> AdvertiseAttributes {
    AdvertiseAttributes { title: model.title.clone(),
                          username: model.username.clone(),
                          description: model.description.clone(),
                          price: model.price }
  }

  fn to_model(&self, record: &AdvertiseRecord) -> AdvertiseModel {
    let a = record.attributes();
    AdvertiseModel { username: a.username.clone(),
                     title: a.title.clone(),
                     description: a.description.clone(),
                     price: a.price }
  }
}
