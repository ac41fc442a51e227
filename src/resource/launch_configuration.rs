//! EC2 launch configuration resource type
//!
//! Launch configurations cannot be modified in place on the cloud side, so
//! `block_device_mappings` and `associate_public_ip_address` are read-only:
//! drift is reported as a warning and never converged. Block device drift is
//! detected on device names only; a changed `volume_size` on an existing
//! device goes unnoticed.

use declarative::{
    Equality, FieldDefinition, ResourceSchema, Rule, SchemaError, Value, ValueShape,
};

pub const TYPE_NAME: &str = "ec2_launchconfiguration";

/// Dependency hint kinds
pub const SECURITY_GROUP: &str = "securityGroup";
pub const VPC: &str = "vpc";

/// Block device attributes, of which at least one must be given
const VOLUME_SOURCES: [&str; 2] = ["volume_size", "snapshot_id"];

/// Build the schema for `ec2_launchconfiguration`
pub fn schema() -> Result<ResourceSchema, SchemaError> {
    ResourceSchema::new(
        TYPE_NAME,
        "Type representing an EC2 launch configuration.",
        vec![
            FieldDefinition::identity("name")
                .rule(Rule::Custom(check_name))
                .doc("The name of the launch configuration."),
            FieldDefinition::property("security_groups")
                .shape(ValueShape::UnorderedSet)
                .rule(Rule::Custom(check_security_group))
                .references(SECURITY_GROUP)
                .doc("The security groups to associate with the instances."),
            FieldDefinition::parameter("user_data")
                .doc("User data script to execute on new instances."),
            FieldDefinition::property("key_name")
                .rule(Rule::String)
                .doc("The name of the key pair associated with this instance."),
            FieldDefinition::property("region")
                .rule(Rule::Token)
                .doc("The region in which to launch the instances."),
            FieldDefinition::property("instance_type")
                .rule(Rule::Token)
                .doc("The type to use for the instances."),
            FieldDefinition::property("image_id")
                .rule(Rule::Token)
                .doc("The image id to use for the instances."),
            FieldDefinition::parameter("vpc")
                .rule(Rule::String)
                .references(VPC)
                .doc(
                    "A hint to specify the VPC, useful when detecting ambiguously \
                     named security groups like default.",
                ),
            FieldDefinition::property("block_device_mappings")
                .shape(ValueShape::UnorderedSet)
                .rule(Rule::Custom(check_block_device))
                .equality(Equality::SetByKey("device_name"))
                .read_only()
                .doc(
                    "One or more mappings that specify how block devices are \
                     exposed to the instance.",
                ),
            FieldDefinition::property("associate_public_ip_address")
                .rule(Rule::Boolean)
                .equality(Equality::StringForm)
                .read_only()
                .default_value(true)
                .doc(
                    "Specifies whether to assign a public IP address to each instance \
                     launched in a Amazon VPC. If the instance is launched into a \
                     default subnet, the default is true.",
                ),
        ],
    )
}

fn check_name(value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some("") => Err("launch configurations must have a name".into()),
        Some(_) => Ok(()),
        None => Err("name should be a String".into()),
    }
}

fn check_security_group(value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some("") => Err("you must specify security groups for the launch configuration".into()),
        Some(_) => Ok(()),
        None => Err("security_groups should be a String".into()),
    }
}

fn check_block_device(value: &Value) -> Result<(), String> {
    let Some(device) = value.as_record() else {
        return Err(format!(
            "block device must be a record with a device_name, got {}",
            value.kind()
        ));
    };

    if !device.contains_key("device_name") {
        return Err("block device must be named".into());
    }

    if !VOLUME_SOURCES.iter().any(|key| device.contains_key(*key)) {
        return Err(format!(
            "block device must include at least one of: {}",
            VOLUME_SOURCES.join(" ")
        ));
    }

    let provisioned_iops = device.get("volume_type").and_then(Value::as_str) == Some("io1");
    if provisioned_iops && !device.contains_key("iops") {
        return Err("must specify iops if using provisioned iops volumes".into());
    }

    Ok(())
}
