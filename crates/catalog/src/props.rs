//! Typed prop schemas for every component in the storefront catalog.
//!
//! Each element `type` has its own strongly-typed shape; validation is
//! deserialization of the open-world prop bag into these structs. Keys a
//! schema does not declare pass through untouched (the tree stays generic
//! over `type`), while declared keys must carry the declared shape.

use serde::Deserialize;

// --- shared enums ----------------------------------------------------------

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
	Left,
	Center,
	Right,
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
	None,
	Underline,
	LineThrough,
}

/// Image scaling behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFit {
	#[default]
	Cover,
	Contain,
	Fill,
	None,
}

/// Icon font family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconLibrary {
	#[default]
	Antdesign,
	Material,
	Feather,
	Fontawesome,
}

/// Corner a badge is pinned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgePosition {
	#[default]
	TopLeft,
	TopRight,
	BottomLeft,
	BottomRight,
}

/// Button fill style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
	Solid,
	Outline,
	Clear,
}

/// Side the button icon sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconAlign {
	Left,
	#[default]
	Right,
	Top,
	Bottom,
}

/// Navigation behavior of a button press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
	#[default]
	Normal,
	Link,
	External,
}

/// Flex main-axis direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
	Row,
	#[default]
	Column,
	RowReverse,
	ColumnReverse,
}

/// Stack orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackDirection {
	Horizontal,
	#[default]
	Vertical,
}

/// Product card presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardLayout {
	#[default]
	Display,
	Row,
	Column,
	Cart,
}

/// Slider arrangement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderLayout {
	#[default]
	Mixed,
	Grid,
	Single,
}

/// Outline-or-solid toggle used by filter and cart buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
	#[default]
	Outline,
	Solid,
}

// --- atomic components -----------------------------------------------------

/// Text display component.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
	#[serde(default)]
	pub content: String,
	pub font_size: Option<f64>,
	pub font_weight: Option<String>,
	pub color: Option<String>,
	pub letter_spacing: Option<f64>,
	pub text_align: Option<TextAlign>,
	pub text_decoration: Option<TextDecoration>,
	pub number_of_lines: Option<u32>,
}

/// Image display component.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
	pub source: String,
	pub width: Option<f64>,
	pub height: Option<f64>,
	#[serde(default)]
	pub content_fit: ContentFit,
	pub border_radius: Option<f64>,
	pub alt: Option<String>,
}

/// Vector icon component.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconProps {
	pub name: String,
	#[serde(default = "default_icon_size")]
	pub size: f64,
	#[serde(default = "default_black")]
	pub color: String,
	#[serde(default)]
	pub library: IconLibrary,
}

fn default_icon_size() -> f64 {
	24.0
}

fn default_black() -> String {
	"black".to_owned()
}

/// Small label/tag badge for sales, new items, and counts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProps {
	pub text: Option<String>,
	pub background_color: Option<String>,
	pub text_color: Option<String>,
	#[serde(default)]
	pub position: BadgePosition,
	pub font_size: Option<f64>,
	pub padding: Option<f64>,
	pub border_radius: Option<f64>,
}

/// Countdown timer for sales and promotions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerProps {
	#[serde(default)]
	pub initial_hours: u32,
	#[serde(default)]
	pub initial_minutes: u32,
	#[serde(default)]
	pub initial_seconds: u32,
	pub background_color: Option<String>,
	pub text_color: Option<String>,
	pub font_size: Option<f64>,
	pub padding: Option<f64>,
}

/// Animated color-flickering attention text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlickerTextProps {
	pub text: String,
	pub flicker_colors: Option<Vec<String>>,
	pub speed: Option<f64>,
	pub font_size: Option<f64>,
	pub font_weight: Option<String>,
}

/// Interactive button with icons and loading states.
///
/// The original schema also accepted a `style` variant string here; that
/// collided with the inline style map every seed element carries, so only
/// `variant` names the fill style.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
	#[serde(default)]
	pub title: String,
	pub variant: Option<ButtonVariant>,
	pub color: Option<String>,
	pub icon_name: Option<String>,
	#[serde(default)]
	pub icon_align: IconAlign,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default)]
	pub loading: bool,
	pub width: Option<f64>,
	pub height: Option<f64>,
	#[serde(default)]
	pub full_width: bool,
	pub border_color: Option<String>,
	#[serde(rename = "type", default)]
	pub kind: ButtonKind,
	pub href: Option<String>,
}

// --- composite components --------------------------------------------------

/// Layout container view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewProps {
	pub flex: Option<f64>,
	#[serde(default)]
	pub flex_direction: FlexDirection,
	pub justify_content: Option<String>,
	pub align_items: Option<String>,
	pub padding: Option<f64>,
	pub padding_horizontal: Option<f64>,
	pub padding_vertical: Option<f64>,
	pub margin: Option<f64>,
	pub width: Option<f64>,
	pub height: Option<f64>,
	pub background_color: Option<String>,
	pub border_radius: Option<f64>,
	pub border_width: Option<f64>,
	pub border_color: Option<String>,
	pub gap: Option<f64>,
}

/// Vertically scrolling container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollViewProps {
	#[serde(default)]
	pub horizontal: bool,
	#[serde(default = "default_true")]
	pub shows_indicator: bool,
}

fn default_true() -> bool {
	true
}

/// Container drawing its children over a background image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBackgroundProps {
	pub source: String,
	pub overlay_color: Option<String>,
}

/// Flex stack container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackProps {
	#[serde(default)]
	pub direction: StackDirection,
	#[serde(default)]
	pub gap: f64,
	pub align: Option<String>,
	pub justify: Option<String>,
	pub padding: Option<f64>,
}

/// Grid layout container.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProps {
	#[serde(default = "default_columns")]
	pub columns: u32,
	pub gap: Option<f64>,
	pub row_gap: Option<f64>,
	pub column_gap: Option<f64>,
	pub padding: Option<f64>,
}

fn default_columns() -> u32 {
	2
}

/// Page header with title.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderProps {
	pub label: String,
	pub background_color: Option<String>,
	pub text_color: Option<String>,
	pub height: Option<f64>,
	#[serde(default = "default_true")]
	pub show_profile: bool,
	pub profile_href: Option<String>,
}

/// Hero banner section with image and CTA.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainBannerProps {
	pub image_url: Option<String>,
	pub title: Option<String>,
	pub subtitle: Option<String>,
	pub cta_text: Option<String>,
	pub cta_href: Option<String>,
	pub overlay_color: Option<String>,
	pub height: Option<f64>,
	pub padding_vertical: Option<f64>,
}

/// Product display card with image, price, and badge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCardProps {
	pub id: Option<String>,
	pub name: Option<String>,
	#[serde(rename = "type", default)]
	pub layout: CardLayout,
	pub width: Option<f64>,
	pub height: Option<f64>,
	pub image_url: Option<String>,
	pub price: Option<String>,
	pub price_value: Option<f64>,
	pub original_price: Option<String>,
	pub rank: Option<u32>,
	pub block_id: Option<String>,
	#[serde(default = "default_true")]
	pub show_cart: bool,
}

/// Horizontal product carousel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSliderProps {
	pub title: Option<String>,
	#[serde(default)]
	pub layout: SliderLayout,
	pub gap: Option<f64>,
	pub num_columns: Option<u32>,
	pub item_width: Option<f64>,
	pub spacing: Option<f64>,
	pub block_id: Option<String>,
}

/// Vertical product grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListProps {
	pub block_id: Option<String>,
	#[serde(default = "default_columns")]
	pub num_columns: u32,
	pub gap: Option<f64>,
	pub item_height: Option<f64>,
	#[serde(default = "default_true")]
	pub show_search: bool,
	#[serde(default = "default_true")]
	pub show_filters: bool,
}

/// Filter button bar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterProps {
	pub filters: Option<Vec<String>>,
	pub active_filter: Option<String>,
	#[serde(default)]
	pub button_style: EdgeStyle,
	pub active_color: Option<String>,
	pub gap: Option<f64>,
	pub padding: Option<f64>,
}

/// Search input with icon.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBarProps {
	pub placeholder: Option<String>,
	pub background_color: Option<String>,
	pub icon_color: Option<String>,
	pub text_color: Option<String>,
	pub height: Option<f64>,
}

/// Quantity stepper that writes to the cart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartButtonProps {
	#[serde(default)]
	pub initial_quantity: u32,
	pub max_quantity: Option<u32>,
	pub min_quantity: Option<u32>,
	#[serde(default)]
	pub button_style: EdgeStyle,
	pub button_color: Option<String>,
}

/// Fixed navigation bar with data-bound badges.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottomNavigationProps {
	pub active_tab: Option<String>,
	pub background_color: Option<String>,
	pub active_color: Option<String>,
	pub inactive_color: Option<String>,
}

/// Inline status or promotional message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageProps {
	pub text: String,
	pub background_color: Option<String>,
	pub text_color: Option<String>,
}
