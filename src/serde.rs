use std::fmt::{self, Formatter};

use serde::de::{Error, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::buffer::ElementAccess;
use crate::dim::Dim;
use crate::frame::Frame;
use crate::index::Idxs;
use crate::shape::Shape;
use crate::traverse;

struct ShapeVisitor;

impl<'a> Visitor<'a> for ShapeVisitor {
    type Value = Shape;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "a sequence of dimensions")
    }

    fn visit_seq<A: SeqAccess<'a>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut axes = Vec::with_capacity(seq.size_hint().unwrap_or(0));

        while let Some(dim) = seq.next_element::<Dim>()? {
            axes.push(dim);
        }

        Shape::from_axes(axes).map_err(A::Error::custom)
    }
}

impl<'a> Deserialize<'a> for Shape {
    fn deserialize<R: Deserializer<'a>>(deserializer: R) -> Result<Self, R::Error> {
        deserializer.deserialize_seq(ShapeVisitor)
    }
}

impl Serialize for Shape {
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rank()))?;

        for dim in self.axes() {
            seq.serialize_element(dim)?;
        }

        seq.end()
    }
}

impl<'a> Deserialize<'a> for Idxs {
    fn deserialize<R: Deserializer<'a>>(deserializer: R) -> Result<Self, R::Error> {
        Ok(Idxs::from(Vec::<usize>::deserialize(deserializer)?))
    }
}

impl Serialize for Idxs {
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        self.as_slice().serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(rename = "Frame")]
struct FrameRepr<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<'a, T: Deserialize<'a>> Deserialize<'a> for Frame<T> {
    fn deserialize<R: Deserializer<'a>>(deserializer: R) -> Result<Self, R::Error> {
        let repr = FrameRepr::<T>::deserialize(deserializer)?;

        Frame::from_vec(repr.shape, repr.data).map_err(R::Error::custom)
    }
}

impl<T: Clone + Serialize> Serialize for Frame<T> {
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        let mut state = serializer.serialize_struct("Frame", 2)?;

        state.serialize_field("shape", self.shape())?;
        state.serialize_field("data", &Elements(self))?;
        state.end()
    }
}

// Elements of a frame in offset order, serialized as a flat sequence.
struct Elements<'a, T>(&'a Frame<T>);

impl<T: Clone + Serialize> Serialize for Elements<'_, T> {
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        let frame = self.0;
        let mut seq = serializer.serialize_seq(Some(frame.len()))?;

        traverse::try_fold::<_, R::Error, _>(frame.shape(), 0, 1, (), |_, offset, ()| {
            seq.serialize_element(frame.buffer().read(offset as usize))
        })?;

        seq.end()
    }
}
