use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    constants::DEFAULT_PAGE_SIZE,
    modules::listing::schema::{ListingStatus, PropertyType},
    utils::double_option,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateListingModel {
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Description is too long"))]
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, message = "Price must be greater than zero"))]
    pub price: i64,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: String,
    pub postcode: Option<String>,
    pub property_type: PropertyType,
    #[validate(range(min = 0, max = 50, message = "Bedrooms must be between 0 and 50"))]
    pub bedrooms: i32,
    #[validate(range(min = 0, max = 50, message = "Bathrooms must be between 0 and 50"))]
    pub bathrooms: i32,
    #[validate(range(min = 1, message = "Square feet must be positive"))]
    pub square_feet: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateListingModel {
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Price must be greater than zero"))]
    pub price: Option<i64>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub postcode: Option<Option<String>>,
    pub property_type: Option<PropertyType>,
    #[validate(range(min = 0, max = 50, message = "Bedrooms must be between 0 and 50"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, max = 50, message = "Bathrooms must be between 0 and 50"))]
    pub bathrooms: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub square_feet: Option<Option<i32>>,
    pub status: Option<ListingStatus>,
}

impl UpdateListingModel {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.postcode.is_none()
            && self.property_type.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.square_feet.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn validate_price_range(query: &ListingQuery) -> Result<(), ValidationError> {
    match (query.min_price, query.max_price) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::new("price_range")
            .with_message("min_price cannot be greater than max_price".into())),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_price_range"))]
pub struct ListingQuery {
    pub city: Option<String>,
    pub property_type: Option<PropertyType>,
    #[validate(range(min = 0))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0))]
    pub max_price: Option<i64>,
    #[validate(range(min = 0, max = 50))]
    pub min_bedrooms: Option<i32>,
    pub status: Option<ListingStatus>,
    pub seller_id: Option<Uuid>,
    #[serde(default)]
    pub sort: ListingSort,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            city: None,
            property_type: None,
            min_price: None,
            max_price: None,
            min_bedrooms: None,
            status: None,
            seller_id: None,
            sort: ListingSort::default(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RemoveImageModel {
    #[validate(length(min = 1, message = "Image url cannot be empty"))]
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct InsertListing {
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub address: String,
    pub city: String,
    pub postcode: Option<String>,
    pub property_type: PropertyType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub square_feet: Option<i32>,
}

impl InsertListing {
    pub fn from_model(seller_id: Uuid, model: CreateListingModel) -> Self {
        Self {
            seller_id,
            title: model.title.trim().to_string(),
            description: model.description,
            price: model.price,
            address: model.address,
            city: model.city.trim().to_string(),
            postcode: model.postcode,
            property_type: model.property_type,
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            square_feet: model.square_feet,
        }
    }
}

/// Field-level patch applied by the repository. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateListing {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<Option<String>>,
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub square_feet: Option<Option<i32>>,
    pub status: Option<ListingStatus>,
}

impl From<UpdateListingModel> for UpdateListing {
    fn from(model: UpdateListingModel) -> Self {
        Self {
            title: model.title.map(|t| t.trim().to_string()),
            description: model.description,
            price: model.price,
            address: model.address,
            city: model.city.map(|c| c.trim().to_string()),
            postcode: model.postcode,
            property_type: model.property_type,
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            square_feet: model.square_feet,
            status: model.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub url: String,
    pub images: Vec<String>,
}
