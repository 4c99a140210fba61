//! The bit-layout planner (C5): precomputes a static bit-offset table for a
//! non-extensible message, so a future straight-line emitter could read a
//! field straight out of its offset instead of walking the codec's
//! recursive descent every time. Refuses outright whenever extensibility
//! is reachable anywhere in the message — a 16-bit length prefix makes the
//! offset of everything after it depend on which producer wrote the bytes,
//! so there is no single static table to hand back.

use log::{debug, trace};

use crate::error::Error;
use crate::ir::{MessageId, Type, Workspace};

/// One field's position in a planned, non-extensible message: `bit_offset`
/// is measured from the start of the message's own payload (0, not
/// counting any enclosing message's prefix or preceding fields).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    pub name: String,
    pub bit_offset: u32,
    pub nbits: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitPlan {
    pub message: MessageId,
    pub fields: Vec<FieldLayout>,
    pub total_bits: u32,
}

/// Computes the static layout for message `id`. Fields are laid out in
/// wire order (ascending field number), matching the order the codec
/// actually writes them in.
pub fn plan_message(ws: &Workspace, id: MessageId) -> Result<BitPlan, Error> {
    let def = ws.message_def(id);
    if Type::Message(id).is_extensible_reachable(ws) {
        debug!("refusing to plan `{}`: extensibility reachable", def.name);
        return Err(Error::Extensible(def.name.clone()));
    }

    let mut bit_offset = 0u32;
    let mut fields = Vec::with_capacity(def.fields.len());
    for field in def.fields_in_wire_order() {
        let nbits = field.ty.nbits(ws);
        trace!("`{}`.{}: {} bit(s) at offset {}", def.name, field.name, nbits, bit_offset);
        fields.push(FieldLayout {
            name: field.name.clone(),
            bit_offset,
            nbits,
        });
        bit_offset += nbits;
    }

    debug!("planned `{}`: {} bit(s) total", def.name, bit_offset);
    Ok(BitPlan {
        message: id,
        fields,
        total_bits: bit_offset,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::{Field, MessageDef, Type};

    fn bare_message(ws: &mut Workspace, extensible: bool, fields: Vec<Field>) -> MessageId {
        let proto = ws.alloc_proto("t".into(), "t.bitproto".into());
        let id = ws.alloc_message(MessageDef {
            id: Default::default(),
            name: "M".into(),
            proto,
            parent: None,
            extensible,
            fields,
            max_bytes: None,
            nbits: 0,
            nested_messages: Vec::new(),
            nested_enums: Vec::new(),
            nested_aliases: Vec::new(),
            nested_consts: Vec::new(),
        });
        let nbits: u32 = ws.message_def(id).fields.iter().map(|f| f.ty.nbits(ws)).sum();
        ws.message_def_mut(id).nbits = if extensible { nbits + 16 } else { nbits };
        id
    }

    #[test]
    fn lays_out_fields_in_ascending_wire_order_regardless_of_declaration_order() {
        let mut ws = Workspace::new();
        let id = bare_message(
            &mut ws,
            false,
            vec![
                Field { name: "b".into(), number: 2, ty: Type::Uint(4) },
                Field { name: "a".into(), number: 1, ty: Type::Bool },
            ],
        );
        let plan = plan_message(&ws, id).unwrap();
        assert_eq!(plan.fields[0].name, "a");
        assert_eq!(plan.fields[0].bit_offset, 0);
        assert_eq!(plan.fields[1].name, "b");
        assert_eq!(plan.fields[1].bit_offset, 1);
        assert_eq!(plan.total_bits, 5);
    }

    #[test]
    fn refuses_an_extensible_message() {
        let mut ws = Workspace::new();
        let id = bare_message(&mut ws, true, vec![Field { name: "a".into(), number: 1, ty: Type::Bool }]);
        assert!(plan_message(&ws, id).is_err());
    }
}
