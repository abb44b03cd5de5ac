use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddressInput {
    pub country: String,
    pub city: String,
    pub postcode: String,
    pub street: String,
    pub number: String,
}

impl AddressInput {
    pub fn is_complete(&self) -> bool {
        [
            &self.country,
            &self.city,
            &self.postcode,
            &self.street,
            &self.number,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}
