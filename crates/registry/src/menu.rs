use std::sync::Arc;

use indexmap::IndexMap;

use crate::MenuItem;

/// Items of one category, in display order.
#[derive(Debug, Clone)]
pub struct MenuGroup<'a> {
	/// Category label.
	pub category: &'a str,
	/// Items sorted by `order`, ties in registration order.
	pub items: Vec<&'a MenuItem>,
}

impl MenuGroup<'_> {
	/// Keys of the group's items, in display order.
	pub fn keys(&self) -> Vec<&str> {
		self.items.iter().map(|item| item.key()).collect()
	}
}

/// View over the registry's menu index.
///
/// Holds no ordering state of its own: every call to [`Menu::groups`] or
/// [`Menu::items`] recomputes the layout from the index, so the view can be
/// iterated any number of times and never goes stale relative to the index
/// it borrows.
#[derive(Debug, Clone, Copy)]
pub struct Menu<'a> {
	index: &'a IndexMap<String, Arc<MenuItem>>,
}

impl<'a> Menu<'a> {
	pub(crate) fn new(index: &'a IndexMap<String, Arc<MenuItem>>) -> Self {
		Self { index }
	}

	/// Grouped view: categories in first-seen order, each sorted by `order`
	/// then registration sequence.
	pub fn groups(self) -> impl Iterator<Item = MenuGroup<'a>> + 'a {
		let mut groups: Vec<MenuGroup<'a>> = Vec::new();
		for item in self.index.values() {
			let item: &'a MenuItem = item;
			match groups.iter_mut().find(|group| group.category == item.category()) {
				Some(group) => group.items.push(item),
				None => groups.push(MenuGroup {
					category: item.category(),
					items: vec![item],
				}),
			}
		}
		// Index iteration is registration order, and the sort is stable.
		for group in &mut groups {
			group.items.sort_by_key(|item| item.order());
		}
		groups.into_iter()
	}

	/// Flat view in the same order as [`Menu::groups`].
	pub fn items(self) -> impl Iterator<Item = &'a MenuItem> + 'a {
		self.groups().flat_map(|group| group.items)
	}

	/// Category labels in display order.
	pub fn categories(self) -> Vec<&'a str> {
		self.groups().map(|group| group.category).collect()
	}

	/// Number of items.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Returns true when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}
}
