//! Component catalog for the storefront.
//!
//! Maps element `type` tags to component definitions: a typed prop
//! schema, whether the component takes children, and a description used
//! to brief the customization agent. Producers of patches validate
//! element definitions here before they reach the tree store; the
//! renderer resolves type tags through the same registry.

pub mod props;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use vstore_renderer::{ComponentRef, Resolve};

use crate::props::*;

/// Why a component definition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
	/// The type tag is not registered.
	#[error("unknown component type: {0}")]
	UnknownType(String),
	/// Declared props do not fit the type's schema.
	#[error("invalid props for {type_name}: {message}")]
	InvalidProps {
		/// The component type being validated.
		type_name: String,
		/// Decoder message describing the first mismatch.
		message: String,
	},
}

fn validate_as<T: DeserializeOwned>(props: &Map<String, Value>) -> Result<(), String> {
	serde_json::from_value::<T>(Value::Object(props.clone()))
		.map(drop)
		.map_err(|e| e.to_string())
}

/// One registered component type.
pub struct ComponentDef {
	name: &'static str,
	description: &'static str,
	has_children: bool,
	validate: fn(&Map<String, Value>) -> Result<(), String>,
}

impl ComponentDef {
	/// Defines a childless component validated against `T`.
	pub fn atomic<T: DeserializeOwned>(name: &'static str, description: &'static str) -> Self {
		Self {
			name,
			description,
			has_children: false,
			validate: validate_as::<T>,
		}
	}

	/// Defines a child-bearing component validated against `T`.
	pub fn composite<T: DeserializeOwned>(name: &'static str, description: &'static str) -> Self {
		Self {
			has_children: true,
			..Self::atomic::<T>(name, description)
		}
	}

	/// The registered type tag.
	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Human-readable summary shown to the agent.
	#[must_use]
	pub fn description(&self) -> &'static str {
		self.description
	}

	/// Whether the component renders children.
	#[must_use]
	pub fn has_children(&self) -> bool {
		self.has_children
	}
}

/// Registry of component definitions, keyed by type tag.
pub struct Catalog {
	defs: FxHashMap<&'static str, ComponentDef>,
}

impl Catalog {
	/// An empty catalog.
	#[must_use]
	pub fn new() -> Self {
		Self {
			defs: FxHashMap::default(),
		}
	}

	/// The full storefront component set.
	#[must_use]
	pub fn builtin() -> Self {
		let mut catalog = Self::new();
		for def in [
			// Atomics
			ComponentDef::composite::<TextProps>("Text", "Text display component"),
			ComponentDef::atomic::<ImageProps>("Image", "Image display component"),
			ComponentDef::atomic::<IconProps>("Icon", "Vector icon component"),
			ComponentDef::atomic::<BadgeProps>("Badge", "Small label/tag badge for sales, new items, and counts"),
			ComponentDef::atomic::<TimerProps>("Timer", "Countdown timer for sales and promotions"),
			ComponentDef::composite::<FlickerTextProps>("FlickerText", "Animated color-flickering text for attention"),
			ComponentDef::atomic::<ButtonProps>("Button", "Interactive button with icons and loading states"),
			// Composites
			ComponentDef::composite::<ViewProps>("View", "Layout container view"),
			ComponentDef::composite::<ScrollViewProps>("ScrollView", "Scrolling content container"),
			ComponentDef::composite::<ImageBackgroundProps>("ImageBackground", "Container drawing children over a background image"),
			ComponentDef::composite::<StackProps>("Stack", "Flex stack container"),
			ComponentDef::composite::<GridProps>("Grid", "Grid layout container"),
			ComponentDef::composite::<HeaderProps>("Header", "Page header with title"),
			ComponentDef::composite::<MainBannerProps>("MainBanner", "Hero banner section with image and CTA"),
			ComponentDef::composite::<ProductCardProps>("ProductCard", "Product display card with image, price, and badge"),
			ComponentDef::composite::<ProductSliderProps>("ProductSlider", "Horizontal product carousel"),
			ComponentDef::composite::<ProductListProps>("ProductList", "Vertical product grid"),
			ComponentDef::composite::<FilterProps>("Filter", "Filter button bar"),
			ComponentDef::atomic::<SearchBarProps>("SearchBar", "Search input with icon"),
			ComponentDef::atomic::<AddToCartButtonProps>("AddToCartButton", "Quantity stepper bound to the cart"),
			ComponentDef::composite::<BottomNavigationProps>("BottomNavigation", "Fixed navigation bar with data-bound badges"),
			ComponentDef::atomic::<MessageProps>("Message", "Inline status or promotional message"),
		] {
			catalog.register(def);
		}
		catalog
	}

	/// Registers (or replaces) a component definition.
	pub fn register(&mut self, def: ComponentDef) {
		self.defs.insert(def.name, def);
	}

	/// Looks up a definition by type tag.
	#[must_use]
	pub fn definition(&self, type_name: &str) -> Option<&ComponentDef> {
		self.defs.get(type_name)
	}

	/// Whether the type renders children; unknown types do not.
	#[must_use]
	pub fn has_children(&self, type_name: &str) -> bool {
		self.defs.get(type_name).is_some_and(ComponentDef::has_children)
	}

	/// Checks a prop bag against the declared schema for `type_name`.
	///
	/// Keys the schema does not declare pass through; declared keys must
	/// carry the declared shape. Unknown types are refused outright.
	pub fn validate(&self, type_name: &str, props: &Map<String, Value>) -> Result<(), ValidateError> {
		let def = self
			.defs
			.get(type_name)
			.ok_or_else(|| ValidateError::UnknownType(type_name.to_owned()))?;
		(def.validate)(props).map_err(|message| ValidateError::InvalidProps {
			type_name: type_name.to_owned(),
			message,
		})
	}

	/// Registered type tags, sorted for stable output.
	#[must_use]
	pub fn names(&self) -> Vec<&'static str> {
		let mut names: Vec<_> = self.defs.keys().copied().collect();
		names.sort_unstable();
		names
	}

	/// Markdown catalog description used to brief the customization agent.
	#[must_use]
	pub fn prompt_text(&self) -> String {
		let mut lines = vec!["# Component Catalog".to_owned(), String::new()];
		let mut section = |title: &str, with_children: bool| {
			lines.push(format!("## {title}"));
			lines.push(String::new());
			let mut defs: Vec<_> = self
				.defs
				.values()
				.filter(|d| d.has_children == with_children)
				.collect();
			defs.sort_unstable_by_key(|d| d.name);
			for def in defs {
				lines.push(format!("- **{}**: {}", def.name, def.description));
			}
			lines.push(String::new());
		};
		section("Atomic Components (No Children)", false);
		section("Composite Components (Can Have Children)", true);
		lines.join("\n").trim_end().to_owned()
	}
}

impl Default for Catalog {
	fn default() -> Self {
		Self::builtin()
	}
}

impl Resolve for Catalog {
	fn resolve(&self, type_name: &str) -> Option<ComponentRef> {
		self.defs
			.get(type_name)
			.map(|def| ComponentRef(def.name.to_owned()))
	}
}
