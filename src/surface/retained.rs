use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::time::Duration;

use crate::layout::{ArcPath, Coord};

use super::{AttrValue, DrawingSurface, Easing};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle,
    Path(ArcPath),
}

/// The last animation started on an element. Attributes already hold the
/// target values; hosts that interpolate use `from` and `duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub from: Vec<(String, AttrValue)>,
    pub duration: Duration,
    pub easing: Easing,
    pub serial: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, AttrValue>,
    pub animation: Option<Animation>,
}

impl Element {
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttrValue::as_number)
    }

    /// Centre of a circle element.
    pub fn center(&self) -> Option<Coord> {
        Some(Coord::new(self.number("cx")?, self.number("cy")?))
    }

    fn class_list(&self) -> String {
        self.classes.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// In-memory element store with an explicit stacking order. Used as the
/// backing surface for SVG export and for the interactive viewer.
#[derive(Clone, Debug, Default)]
pub struct RetainedSurface {
    elements: Vec<Option<Element>>,
    /// Slots emptied by `remove`, reused by the next insert.
    free: Vec<usize>,
    z_order: Vec<ElementId>,
    animation_serial: u64,
}

impl RetainedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Allocated element slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.elements.len()
    }

    /// Live elements from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.z_order
            .iter()
            .filter_map(|&id| self.get(id).map(|element| (id, element)))
    }

    pub fn with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = ElementId> + 'a {
        self.iter()
            .filter(move |(_, element)| element.classes.contains(class))
            .map(|(id, _)| id)
    }

    /// Ids of removed elements are handed out again, so handles must not
    /// outlive their `remove`.
    fn insert(&mut self, element: Element) -> ElementId {
        let id = match self.free.pop() {
            Some(slot) => {
                self.elements[slot] = Some(element);
                ElementId(slot)
            }
            None => {
                self.elements.push(Some(element));
                ElementId(self.elements.len() - 1)
            }
        };
        self.z_order.push(id);
        id
    }

    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
        );
        svg.push('\n');

        for (_, element) in self.iter() {
            let mut attributes = element
                .attributes
                .iter()
                .filter(|(name, _)| name.as_str() != "class")
                .map(|(name, value)| format!(r#"{name}="{}""#, escape(&value.to_string())))
                .collect::<Vec<_>>();
            if !element.classes.is_empty() {
                attributes.push(format!(r#"class="{}""#, escape(&element.class_list())));
            }

            let tag = match element.shape {
                Shape::Circle => "circle",
                Shape::Path(_) => "path",
            };
            let _ = writeln!(svg, "  <{tag} {}/>", attributes.join(" "));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl DrawingSurface for RetainedSurface {
    type Handle = ElementId;

    fn create_circle(&mut self, center: Coord, radius: f64) -> ElementId {
        let attributes = BTreeMap::from([
            ("cx".to_owned(), AttrValue::Number(center.x)),
            ("cy".to_owned(), AttrValue::Number(center.y)),
            ("r".to_owned(), AttrValue::Number(radius)),
        ]);
        self.insert(Element {
            shape: Shape::Circle,
            classes: BTreeSet::new(),
            attributes,
            animation: None,
        })
    }

    fn create_path(&mut self, path: &ArcPath) -> ElementId {
        let attributes = BTreeMap::from([
            ("d".to_owned(), AttrValue::Text(path.to_svg_path())),
            ("fill".to_owned(), AttrValue::from("none")),
        ]);
        self.insert(Element {
            shape: Shape::Path(*path),
            classes: BTreeSet::new(),
            attributes,
            animation: None,
        })
    }

    fn add_class(&mut self, handle: ElementId, class: &str) {
        if let Some(element) = self.get_mut(handle) {
            element.classes.insert(class.to_owned());
        }
    }

    fn remove_class(&mut self, handle: ElementId, class: &str) {
        if let Some(element) = self.get_mut(handle) {
            element.classes.remove(class);
        }
    }

    fn has_class(&self, handle: ElementId, class: &str) -> bool {
        self.get(handle)
            .is_some_and(|element| element.classes.contains(class))
    }

    fn set_attribute(&mut self, handle: ElementId, name: &str, value: AttrValue) {
        if let Some(element) = self.get_mut(handle) {
            element.attributes.insert(name.to_owned(), value);
        }
    }

    fn attribute(&self, handle: ElementId, name: &str) -> Option<AttrValue> {
        self.get(handle)
            .and_then(|element| element.attributes.get(name).cloned())
    }

    fn animate(
        &mut self,
        handle: ElementId,
        targets: &[(&str, AttrValue)],
        duration: Duration,
        easing: Easing,
    ) {
        self.animation_serial = self.animation_serial.wrapping_add(1);
        let serial = self.animation_serial;

        let Some(element) = self.get_mut(handle) else {
            return;
        };

        let mut from = Vec::with_capacity(targets.len());
        for (name, value) in targets {
            let previous = element
                .attributes
                .insert((*name).to_owned(), value.clone())
                .unwrap_or_else(|| value.clone());
            from.push(((*name).to_owned(), previous));
        }

        element.animation = Some(Animation {
            from,
            duration,
            easing,
            serial,
        });
    }

    fn raise_to_front(&mut self, handle: ElementId) {
        if let Some(position) = self.z_order.iter().position(|&id| id == handle) {
            let id = self.z_order.remove(position);
            self.z_order.push(id);
        }
    }

    fn remove(&mut self, handle: ElementId) {
        if let Some(slot) = self.elements.get_mut(handle.0)
            && slot.take().is_some()
        {
            self.free.push(handle.0);
        }
        self.z_order.retain(|&id| id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_moves_element_to_top() {
        let mut surface = RetainedSurface::new();
        let circle = surface.create_circle(Coord::new(1.0, 2.0), 5.0);
        let path = surface.create_path(&ArcPath {
            start: Coord::new(0.0, 0.0),
            control_start: Coord::new(0.0, 10.0),
            control_end: Coord::new(4.0, 10.0),
            end: Coord::new(4.0, 0.0),
        });
        assert_eq!(surface.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![circle, path]);

        surface.raise_to_front(circle);
        assert_eq!(surface.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![path, circle]);
    }

    #[test]
    fn classes_and_removal() {
        let mut surface = RetainedSurface::new();
        let circle = surface.create_circle(Coord::new(1.0, 2.0), 5.0);
        surface.add_class(circle, "point");
        surface.add_class(circle, "point");
        assert!(surface.has_class(circle, "point"));
        assert_eq!(surface.with_class("point").count(), 1);

        surface.remove_class(circle, "point");
        assert!(!surface.has_class(circle, "point"));

        surface.remove(circle);
        assert!(surface.is_empty());
        assert_eq!(surface.attribute(circle, "r"), None);
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut surface = RetainedSurface::new();
        let first = surface.create_circle(Coord::new(0.0, 0.0), 5.0);
        let second = surface.create_circle(Coord::new(10.0, 0.0), 5.0);
        surface.remove(first);
        surface.remove(first);

        let third = surface.create_circle(Coord::new(20.0, 0.0), 5.0);
        assert_eq!(third, first);
        assert_eq!(surface.slot_count(), 2);
        assert_eq!(surface.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![second, third]);
        assert_eq!(surface.attribute(third, "cx"), Some(AttrValue::Number(20.0)));
    }

    #[test]
    fn animation_applies_target_and_keeps_origin() {
        let mut surface = RetainedSurface::new();
        let circle = surface.create_circle(Coord::new(1.0, 2.0), 5.0);
        surface.animate(
            circle,
            &[("r", AttrValue::Number(8.0))],
            Duration::from_millis(150),
            Easing::EaseOut,
        );

        let element = surface.get(circle).unwrap();
        assert_eq!(element.number("r"), Some(8.0));
        let animation = element.animation.as_ref().unwrap();
        assert_eq!(animation.from, vec![("r".to_owned(), AttrValue::Number(5.0))]);
    }

    #[test]
    fn svg_lists_elements_in_stacking_order() {
        let mut surface = RetainedSurface::new();
        let circle = surface.create_circle(Coord::new(20.0, 100.0), 5.0);
        surface.add_class(circle, "point");
        let path = surface.create_path(&ArcPath {
            start: Coord::new(20.0, 102.5),
            control_start: Coord::new(20.0, 200.0),
            control_end: Coord::new(60.0, 200.0),
            end: Coord::new(60.0, 102.5),
        });
        surface.add_class(path, "arc");
        surface.raise_to_front(circle);

        let svg = surface.to_svg(160.0, 200.0);
        let path_at = svg.find("<path").unwrap();
        let circle_at = svg.find("<circle").unwrap();
        assert!(path_at < circle_at);
        assert!(svg.contains(r#"d="M20 102.5 C20 200 60 200 60 102.5""#));
        assert!(svg.contains(r#"<circle cx="20" cy="100" r="5" class="point"/>"#));
    }
}
