use crate::error::{Result, SelectError};
use crate::gate::{Ask, AutoResolve};
use crate::ports::{Picker, PromptConfig, VpcLister};
use crate::types::{Subnet, SubnetVisibility, Vpc};

/// Network placement choices for new environments.
pub struct Ec2Selector<'a> {
    vpcs: &'a dyn VpcLister,
    picker: &'a dyn Picker,
}

impl<'a> Ec2Selector<'a> {
    pub fn new(vpcs: &'a dyn VpcLister, picker: &'a dyn Picker) -> Self {
        Self { vpcs, picker }
    }

    /// Returns the chosen VPC id. Always asks, even for a single VPC.
    pub fn vpc(&self, ask: Ask<'_>) -> Result<String> {
        let vpcs = self
            .vpcs
            .list_vpcs()
            .map_err(|err| SelectError::collaborator("list VPCs", err))?;
        if vpcs.is_empty() {
            return Err(SelectError::no_candidates("existing VPCs", None));
        }
        AutoResolve::new(self.picker, "VPC")
            .prompt(ask, vpcs, Vpc::label)
            .map(|vpc| vpc.id)
    }

    pub fn public_subnets(&self, ask: Ask<'_>, vpc_id: &str) -> Result<Vec<String>> {
        self.subnets(ask, vpc_id, SubnetVisibility::Public)
    }

    pub fn private_subnets(&self, ask: Ask<'_>, vpc_id: &str) -> Result<Vec<String>> {
        self.subnets(ask, vpc_id, SubnetVisibility::Private)
    }

    fn subnets(
        &self,
        ask: Ask<'_>,
        vpc_id: &str,
        visibility: SubnetVisibility,
    ) -> Result<Vec<String>> {
        let kind = visibility.as_str();
        let subnets = self.vpcs.list_subnets(vpc_id, visibility).map_err(|err| {
            SelectError::collaborator(format!("list {kind} subnets of VPC {vpc_id}"), err)
        })?;
        if subnets.is_empty() {
            return Err(SelectError::no_candidates(
                format!("existing {kind} subnets"),
                Some(format!("VPC {vpc_id}")),
            ));
        }

        let labels: Vec<String> = subnets.iter().map(Subnet::label).collect();
        let chosen = self
            .picker
            .select_many(ask.message, ask.help, &labels, &PromptConfig::default())
            .map_err(|err| SelectError::prompt(format!("{kind} subnets"), err))?;

        let mut ids: Vec<String> = Vec::with_capacity(chosen.len());
        for label in chosen {
            let index = labels
                .iter()
                .position(|l| *l == label)
                .ok_or(SelectError::UnknownChoice(label))?;
            let id = &subnets[index].id;
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        Ok(ids)
    }
}
