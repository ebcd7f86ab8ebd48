//! Product metafield and variant lookups.

use crate::error::ShopifyError;
use crate::types::{
    parse_gid, GraphQlRequest, GraphQlResponse, Metafield, MetafieldsResponse, Variant,
    VariantResponse, VariantsBySkuData,
};

use super::ShopifyAdminClient;

/// How many candidates to pull back for a SKU search. Shopify's `sku:`
/// filter is a prefix/token match, so the exact match is picked client-side.
const SKU_SEARCH_LIMIT: u32 = 5;

const VARIANTS_BY_SKU_QUERY: &str = "query VariantsBySku($query: String!, $first: Int!) { \
     productVariants(first: $first, query: $query) { \
     nodes { id sku inventoryItem { id } } } }";

impl ShopifyAdminClient {
    /// Reads one metafield value for a product.
    ///
    /// A product that no longer exists (404) is treated the same as one
    /// without the metafield.
    ///
    /// # Errors
    ///
    /// Any [`ShopifyError`] other than [`ShopifyError::NotFound`].
    pub async fn get_product_metafield(
        &self,
        product_id: u64,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, ShopifyError> {
        let url = self.endpoint(
            &format!("products/{product_id}/metafields.json"),
            &[("namespace", namespace), ("key", key)],
        )?;

        let parsed: MetafieldsResponse = match self
            .get_json(url, &format!("metafields for product {product_id}"))
            .await
        {
            Ok(parsed) => parsed,
            Err(ShopifyError::NotFound { url }) => {
                tracing::debug!(product_id, url = %url, "product not found; no metafield");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(parsed
            .metafields
            .iter()
            .find(|m| m.namespace == namespace && m.key == key)
            .and_then(Metafield::value_string))
    }

    /// Reads a variant by id.
    ///
    /// # Errors
    ///
    /// Any [`ShopifyError`]; a missing variant is [`ShopifyError::NotFound`].
    pub async fn get_variant(&self, variant_id: u64) -> Result<Variant, ShopifyError> {
        let url = self.endpoint(&format!("variants/{variant_id}.json"), &[])?;
        let parsed: VariantResponse = self
            .get_json(url, &format!("variant {variant_id}"))
            .await?;
        Ok(parsed.variant)
    }

    /// Finds the variant whose SKU equals `sku` exactly, via the GraphQL
    /// Admin API (REST has no SKU filter).
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::GraphQl`] if the response carries top-level errors.
    /// - [`ShopifyError::InvalidId`] if a returned global id cannot be parsed.
    /// - Any transport or status error from the request itself.
    pub async fn get_variant_by_sku(&self, sku: &str) -> Result<Option<Variant>, ShopifyError> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Ok(None);
        }

        let url = self.endpoint("graphql.json", &[])?;
        let body = GraphQlRequest {
            query: VARIANTS_BY_SKU_QUERY,
            variables: serde_json::json!({
                "query": sku_search_query(sku),
                "first": SKU_SEARCH_LIMIT,
            }),
        };

        let response = self
            .execute(self.client.post(url.clone()).json(&body), &url)
            .await?;
        let parsed: GraphQlResponse<VariantsBySkuData> =
            Self::decode(response, &format!("variant lookup for SKU {sku}")).await?;

        if !parsed.errors.is_empty() {
            let message = parsed
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ShopifyError::GraphQl(message));
        }

        let Some(data) = parsed.data else {
            return Err(ShopifyError::GraphQl(
                "response contained neither data nor errors".to_owned(),
            ));
        };

        let Some(node) = data
            .product_variants
            .nodes
            .into_iter()
            .find(|n| n.sku.as_deref().map(str::trim) == Some(sku))
        else {
            return Ok(None);
        };

        Ok(Some(Variant {
            id: parse_gid(&node.id, "product variant")?,
            inventory_item_id: parse_gid(&node.inventory_item.id, "inventory item")?,
            sku: node.sku,
        }))
    }
}

/// Builds a Shopify search-syntax query matching a SKU, quoting it so that
/// spaces and colons in the SKU are not read as search operators.
fn sku_search_query(sku: &str) -> String {
    let escaped = sku.replace('\\', "\\\\").replace('"', "\\\"");
    format!("sku:\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_search_query_quotes_plain_sku() {
        assert_eq!(sku_search_query("MASTER-1"), "sku:\"MASTER-1\"");
    }

    #[test]
    fn sku_search_query_escapes_quotes_and_backslashes() {
        assert_eq!(sku_search_query(r#"A"B\C"#), r#"sku:"A\"B\\C""#);
    }
}
