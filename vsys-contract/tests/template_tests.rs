//! Token template catalog tests

use pretty_assertions::assert_eq;
use test_case::test_case;
use vsys_contract::core::contract::StateVar;
use vsys_contract::core::framing;
use vsys_contract::core::templates::{INIT_ID, operation_table};
use vsys_contract::{
    CallType, Contract, FunctionKind, FunctionDescriptor, Opcode, TemplateVariant, TypeTag,
    token_template,
};

const ALL_VARIANTS: [TemplateVariant; 2] = [TemplateVariant::WithoutSplit, TemplateVariant::WithSplit];

#[test]
fn declared_opcode_list_length_matches_frame() {
    for variant in ALL_VARIANTS {
        let contract = token_template(variant).unwrap();
        let functions = contract
            .trigger()
            .iter()
            .map(|bytes| (FunctionKind::Trigger, bytes))
            .chain(contract.descriptor().iter().map(|bytes| (FunctionKind::Descriptor, bytes)));
        for (kind, encoded) in functions {
            let function = FunctionDescriptor::from_bytes(encoded, kind).unwrap();

            // id:2, callType:1, then both prototype blobs
            let returns = framing::read_u16(encoded, 3).unwrap() as usize;
            let params = framing::read_u16(encoded, 5 + returns).unwrap() as usize;
            let list_at = 7 + returns + params;
            let declared = framing::read_u16(encoded, list_at).unwrap() as usize;

            assert_eq!(declared, function.opcode_list_len(), "{variant:?} function {}", function.id);
            assert_eq!(encoded.len(), list_at + 2 + declared);
        }
    }
}

#[test_case(TemplateVariant::WithoutSplit, 1, 11 ; "without split")]
#[test_case(TemplateVariant::WithSplit, 2, 12 ; "with split")]
fn template_shape(variant: TemplateVariant, version: u32, descriptors: usize) {
    let contract = token_template(variant).unwrap();
    assert_eq!(contract.language_code().to_string(), "vdds");
    assert_eq!(contract.language_version(), version);
    assert_eq!(contract.trigger().len(), 1);
    assert_eq!(contract.descriptor().len(), descriptors);
    assert!(contract.state_map().is_empty());
    assert_eq!(contract.has_state_map(), version > 1);
}

#[test]
fn templates_parse_back() {
    for variant in ALL_VARIANTS {
        let contract = token_template(variant).unwrap();
        let bytes = contract.to_bytes().unwrap();
        assert_eq!(&Contract::from_bytes(&bytes).unwrap(), contract);
    }
}

#[test]
fn descriptor_ids_are_table_positions() {
    for variant in ALL_VARIANTS {
        let contract = token_template(variant).unwrap();
        let descriptors = contract.descriptors().unwrap();
        let names = contract.textual_names().unwrap().descriptors;

        assert_eq!(descriptors.len(), names.len());
        for (index, (function, textual)) in descriptors.iter().zip(&names).enumerate() {
            assert_eq!(function.id as usize, index);
            assert_eq!(function.call_type, CallType::Public);
            assert_eq!(variant.function_id(&textual.name), Some(function.id));
        }
    }
}

#[test]
fn init_trigger_matches_catalog() {
    let contract = token_template(TemplateVariant::WithSplit).unwrap();
    let triggers = contract.triggers().unwrap();
    assert_eq!(triggers.len(), 1);

    let init = &triggers[0];
    assert_eq!(init.id, INIT_ID);
    assert_eq!(init.call_type, CallType::OnInit);
    assert_eq!(
        init.prototype.param_types,
        vec![TypeTag::Amount, TypeTag::Amount, TypeTag::ShortText]
    );
    let opcodes: Vec<_> = init.instructions.iter().map(|i| i.opcode).collect();
    assert_eq!(
        opcodes,
        vec![Opcode::SignerLoad, Opcode::SetCdbv, Opcode::SetCdbv, Opcode::NewTokenTdb]
    );

    let names = contract.textual_names().unwrap();
    assert_eq!(names.triggers[0].name, "init");
    assert_eq!(
        names.triggers[0].param_names,
        vec!["max", "unity", "tokenDescription", "signer"]
    );
}

#[test]
fn state_variables_are_issuer_and_maker() {
    for variant in ALL_VARIANTS {
        let contract = token_template(variant).unwrap();
        assert_eq!(
            contract.state_variables().unwrap(),
            vec![
                StateVar::new(0, TypeTag::Address),
                StateVar::new(1, TypeTag::Address)
            ]
        );
        assert_eq!(
            contract.textual_names().unwrap().state_variables,
            vec!["issuer", "maker"]
        );
    }
}

#[test]
fn split_template_carries_empty_state_map_names() {
    let plain = token_template(TemplateVariant::WithoutSplit).unwrap();
    assert_eq!(plain.textual_names().unwrap().state_maps, None);

    let split = token_template(TemplateVariant::WithSplit).unwrap();
    assert_eq!(split.textual_names().unwrap().state_maps, Some(vec![]));
}

#[test]
fn split_descriptor_layout() {
    let contract = token_template(TemplateVariant::WithSplit).unwrap();
    let split = FunctionDescriptor::from_bytes(&contract.descriptor()[3], FunctionKind::Descriptor).unwrap();
    assert_eq!(split.id, 3);
    assert_eq!(split.prototype.param_types, vec![TypeTag::Amount]);
    assert_eq!(split.instructions.last().map(|i| i.opcode), Some(Opcode::SplitTdb));

    let send_id = TemplateVariant::WithSplit.function_id("send").unwrap();
    let send = &contract.descriptors().unwrap()[send_id as usize];
    assert_eq!(send.prototype.param_types, vec![TypeTag::Account, TypeTag::Amount]);
}

#[test]
fn query_functions_return_values() {
    for operation in operation_table(true) {
        let returns = !operation.return_types.is_empty();
        let ends_with_return = operation
            .instructions
            .last()
            .is_some_and(|(opcode, _)| *opcode == Opcode::ReturnValue);
        assert_eq!(returns, ends_with_return, "{}", operation.name);
    }
}
