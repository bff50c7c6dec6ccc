//! Status and role enums for domain entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Orders are created as `Processing` at checkout and only move between
/// statuses through the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    /// All statuses, in the order the admin console offers them.
    pub const ALL: [Self; 5] = [
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "Processing"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Returned => write!(f, "Returned"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            "Returned" => Ok(Self::Returned),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Account role. Admin accounts see the back-office surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Tops,
    Shirts,
    Dresses,
    Bottoms,
    Outerwear,
    Accessories,
}

impl Category {
    /// All categories, in storefront filter order.
    pub const ALL: [Self; 6] = [
        Self::Tops,
        Self::Shirts,
        Self::Dresses,
        Self::Bottoms,
        Self::Outerwear,
        Self::Accessories,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tops => write!(f, "Tops"),
            Self::Shirts => write!(f, "Shirts"),
            Self::Dresses => write!(f, "Dresses"),
            Self::Bottoms => write!(f, "Bottoms"),
            Self::Outerwear => write!(f, "Outerwear"),
            Self::Accessories => write!(f, "Accessories"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tops" => Ok(Self::Tops),
            "Shirts" => Ok(Self::Shirts),
            "Dresses" => Ok(Self::Dresses),
            "Bottoms" => Ok(Self::Bottoms),
            "Outerwear" => Ok(Self::Outerwear),
            "Accessories" => Ok(Self::Accessories),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}
