mod partner_gateway;

pub use partner_gateway::PartnerGateway;
